//! Placeholder selection.
//!
//! ## Precedence
//!
//! 1. Walk the chain nearest to farthest. The first category with any rule
//!    is selected; ancestors beyond it are never consulted.
//! 2. Within the selected category the last authored rule wins.
//! 3. The winning rule's field for the composer mode is the result. A blank
//!    field resolves to "no override"; it does not fall through to an
//!    ancestor.
//!
//! Everything is computed from one configuration snapshot and one context
//! value. Nothing here mutates or fails.

use placard_core::{AsyncCategoryLookup, CategoryId, CategoryLookup, ComposerContext, ComposerMode, Placeholder};
use placard_settings::ConfigurationSet;
use serde::Serialize;
use tracing::debug;

use crate::chain::{AncestryChain, build_chain, build_chain_async};

/// Where a resolved placeholder came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    /// Category whose rule was used.
    pub category_id: CategoryId,
    /// Position of that category in the chain (0 = the composer's own category).
    pub depth: usize,
    /// Position of the winning rule in the authored list.
    pub rule_index: usize,
}

/// Full outcome of a resolution, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The text to display; empty means "use the default".
    pub placeholder: Placeholder,
    /// The rule that decided the result, if any category in the chain matched.
    pub matched: Option<RuleMatch>,
    /// Candidate categories that were considered. `None` for unscoped contexts.
    pub chain: Option<AncestryChain>,
}

impl Resolution {
    fn unscoped() -> Self {
        Self {
            placeholder: Placeholder::none(),
            matched: None,
            chain: None,
        }
    }
}

/// Resolve the placeholder text for `context`.
pub fn resolve(
    context: &ComposerContext,
    config: &ConfigurationSet,
    lookup: &impl CategoryLookup,
) -> Placeholder {
    resolve_detailed(context, config, lookup).placeholder
}

/// Resolve with the matched rule and chain attached.
pub fn resolve_detailed(
    context: &ComposerContext,
    config: &ConfigurationSet,
    lookup: &impl CategoryLookup,
) -> Resolution {
    let Some(category_id) = context.category_id else {
        return Resolution::unscoped();
    };
    let chain = build_chain(category_id, config.inherit_from_parent(), lookup);
    select(context.mode, config, chain)
}

/// Resolve using a lookup that may need to fetch parents.
pub async fn resolve_async(
    context: &ComposerContext,
    config: &ConfigurationSet,
    lookup: &dyn AsyncCategoryLookup,
) -> Resolution {
    let Some(category_id) = context.category_id else {
        return Resolution::unscoped();
    };
    let chain = build_chain_async(category_id, config.inherit_from_parent(), lookup).await;
    select(context.mode, config, chain)
}

/// Pick the placeholder for `mode` from the first chain entry that has rules.
#[must_use]
pub fn select(mode: ComposerMode, config: &ConfigurationSet, chain: AncestryChain) -> Resolution {
    let found = chain
        .ids()
        .iter()
        .enumerate()
        .find_map(|(depth, &id)| config.winning_rule(id).map(|(index, rule)| (depth, id, index, rule)));

    let Some((depth, category_id, rule_index, rule)) = found else {
        debug!(start = %chain.ids()[0], %mode, "no placeholder rule in chain");
        return Resolution {
            placeholder: Placeholder::none(),
            matched: None,
            chain: Some(chain),
        };
    };

    let placeholder = rule
        .placeholder_for(mode)
        .map(Placeholder::from)
        .unwrap_or_default();

    debug!(
        start = %chain.ids()[0],
        matched = %category_id,
        depth,
        rule_index,
        %mode,
        is_override = placeholder.is_override(),
        "placeholder resolved"
    );

    Resolution {
        placeholder,
        matched: Some(RuleMatch {
            category_id,
            depth,
            rule_index,
        }),
        chain: Some(chain),
    }
}

use tracing::debug;

use crate::error::Result;
use crate::provider::RulesetProvider;
use crate::ruleset::Ruleset;
use crate::scope::Scope;

/// Finds the ruleset in `scope` that a config with this `id` and `name`
/// refers to.
///
/// A non-zero `id` is tried first; on a miss the scope's own rulesets
/// (inherited ones excluded) are scanned for an exact `name` match. When
/// several share the name, the first in listing order wins. No match is
/// `Ok(None)`: only transport failures are errors.
pub async fn resolve<P>(
    provider: &P,
    scope: &Scope,
    id: Option<u64>,
    name: &str,
) -> Result<Option<Ruleset>>
where
    P: RulesetProvider + ?Sized,
{
    if let Some(id) = id.filter(|id| *id != 0) {
        match provider.fetch_ruleset(scope, id, false).await {
            Ok(ruleset) => return Ok(Some(ruleset)),
            Err(err) if err.is_not_found() => {
                debug!(ruleset_id = id, scope = %scope, "no ruleset with this id, matching by name");
            }
            Err(err) => return Err(err),
        }
    }

    let found = provider
        .list_rulesets(scope, false)
        .await?
        .into_iter()
        .find(|ruleset| ruleset.name == name);

    Ok(found)
}

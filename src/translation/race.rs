// Two-provider race: dispatch both, await both, pick by priority
// Author: kelexine (https://github.com/kelexine)

use crate::providers::{ProviderResult, TranslationProvider};

/// The provider whose result was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub provider: String,
    pub text: String,
}

/// Runs one attempt: both providers are dispatched before either is
/// awaited, and the attempt settles only once both have.
///
/// Results come back in priority order, primary first.
pub async fn run(
    primary: &dyn TranslationProvider,
    fallback: &dyn TranslationProvider,
    text: &str,
    credential: &str,
) -> Vec<ProviderResult> {
    let primary_call = async {
        ProviderResult {
            provider: primary.name().to_string(),
            outcome: primary.translate(text, credential).await,
        }
    };
    let fallback_call = async {
        ProviderResult {
            provider: fallback.name().to_string(),
            outcome: fallback.translate(text, credential).await,
        }
    };

    let (first, second) = futures::join!(primary_call, fallback_call);
    vec![first, second]
}

/// Picks the first success in priority order. When nothing succeeded the
/// error is every provider's reason joined with `"; "`.
pub fn select(results: Vec<ProviderResult>) -> Result<Winner, String> {
    let mut reasons = Vec::with_capacity(results.len());

    for result in results {
        if let Some(reason) = result.failure_reason() {
            reasons.push(reason);
            continue;
        }
        if let Ok(text) = result.outcome {
            return Ok(Winner {
                provider: result.provider,
                text,
            });
        }
    }

    Err(reasons.join("; "))
}

//! Product name suggestions.

use marchenet_storefront::search::SuggestionService;
use tokio_util::sync::CancellationToken;

use super::{CommandError, Context, parse_country};

/// Print suggestions for `query`. Ctrl+C aborts a slow lookup.
pub async fn suggest(ctx: &Context, query: &str, country: Option<&str>) -> Result<(), CommandError> {
    let country = country.map(parse_country).transpose()?;
    let service = SuggestionService::new(ctx.api.clone(), &ctx.config.suggestions);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let names = service
        .suggest(query, country.map(|c| c.name()), &cancel)
        .await?;

    if names.is_empty() {
        tracing::info!("No suggestions for {query:?}");
    }
    for name in names {
        tracing::info!("{name}");
    }
    Ok(())
}

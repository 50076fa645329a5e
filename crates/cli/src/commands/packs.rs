//! Pack catalog listing.

use marchenet_core::PACKS;

/// Print every pack, cheapest first.
pub fn list() {
    for pack in &PACKS {
        let limit = pack
            .daily_limit
            .map_or_else(|| "sans limite".to_string(), |n| format!("{n}/jour"));
        tracing::info!(
            "{:<14} {:>10}  {} jours, {} produits ({limit})",
            pack.name,
            pack.price().to_string(),
            pack.duration_days,
            pack.quota,
        );
        tracing::info!("    {}", pack.description);
        for benefit in pack.benefits {
            tracing::info!("    - {benefit}");
        }
    }
}

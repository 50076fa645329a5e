//! Subscription packs offered to vendors.
//!
//! The catalog is static configuration. A vendor record only keeps a copy of
//! the chosen pack's name and quota.

use serde::Serialize;

use super::price::Price;

/// A subscription tier with a price, a duration and a product quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub name: &'static str,
    /// Price in CFA francs for one period.
    pub price_xof: u64,
    pub duration_days: u32,
    /// Maximum number of live product listings.
    pub quota: u32,
    /// Maximum number of listings published per day, `None` for no limit.
    pub daily_limit: Option<u32>,
    pub description: &'static str,
    pub benefits: &'static [&'static str],
}

/// The pack catalog, cheapest first.
pub static PACKS: [Pack; 4] = [
    Pack {
        name: "Pack Gratuit",
        price_xof: 0,
        duration_days: 30,
        quota: 2,
        daily_limit: Some(1),
        description: "Commencez avec les bases et testez la plateforme.",
        benefits: &[
            "2 produits maximum",
            "1 mois gratuit pour les nouveaux inscrits",
            "Support par email",
        ],
    },
    Pack {
        name: "Pack Basique",
        price_xof: 3500,
        duration_days: 30,
        quota: 10,
        daily_limit: Some(5),
        description: "Idéal pour les petits vendeurs qui veulent se développer.",
        benefits: &[
            "10 produits par mois",
            "1 mois gratuit pour les nouveaux inscrits",
            "Statistiques de base",
            "Support par email",
        ],
    },
    Pack {
        name: "Pack Pro",
        price_xof: 7500,
        duration_days: 30,
        quota: 25,
        daily_limit: Some(10),
        description: "Boostez votre visibilité et atteignez plus de clients.",
        benefits: &[
            "25 produits par mois",
            "1 mois gratuit pour les nouveaux inscrits",
            "Annonces prioritaires",
            "Support par chat",
        ],
    },
    Pack {
        name: "Pack VIP",
        price_xof: 20000,
        duration_days: 30,
        quota: 9999,
        daily_limit: None,
        description: "Tous les avantages pour une boutique de référence.",
        benefits: &[
            "Produits illimités",
            "Visibilité maximale",
            "Badge vérifié",
            "Support prioritaire 24/7",
        ],
    },
];

impl Pack {
    /// Look up a pack by exact name.
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        PACKS.iter().find(|p| p.name == name)
    }

    /// The zero-price pack.
    #[must_use]
    pub fn free() -> &'static Self {
        &PACKS[0]
    }

    #[must_use]
    pub fn price(&self) -> Price {
        Price::xof(self.price_xof)
    }

    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.price_xof == 0
    }
}

//! Static advisory text shown next to strengths and focus areas.

use crate::metrics::Metric;

/// What the courier can do to move this metric.
pub fn recommendation(metric: Metric) -> &'static str {
    match metric {
        Metric::DeliveryStandards => {
            "Důsledněji dodržujte standardy doručování (2× telefonát, min. 20 s vyzvánění, pak fyzický pokus) a hlídejte úspěšnost doručení do boxů s rezervovanou schránkou."
        }
        Metric::RideEfficiency => {
            "Zaměřte se na rychlost nakládky i doručení – efektivita roste se zkušeností, pomůže konzistentní tempo a lepší plánování trasy."
        }
        Metric::ArrivalDelay => {
            "Po přijetí jízdy jeďte bezodkladně na depo a minimalizujte zpoždění vůči odhadu v aplikaci."
        }
        Metric::InRideDelay => {
            "Minimalizujte zpoždění během rozvozu – pomůže plynulejší průběh trasy, méně prostojů a rychlé řešení problémů na místě."
        }
        Metric::PeakDayRides => {
            "Buďte dostupnější v exponované dny (pondělí, úterý, pátek) – výrazně to zvyšuje užitečnost v regionu."
        }
        Metric::DoubledRides => {
            "Využívejte zdvojené jízdy nebo jízdy na otočku, pokud jsou k dispozici."
        }
        Metric::DeliveryQuality => {
            "Důsledněji dodržujte standardy doručování a hlídejte úspěšnost doručení."
        }
    }
}

/// Why the metric matters to the business.
pub fn why_it_matters(metric: Metric) -> &'static str {
    match metric {
        Metric::DeliveryStandards => {
            "Kvalita – vyšší úspěšnost doručení zvyšuje spokojenost zákazníků."
        }
        Metric::RideEfficiency => {
            "Produktivita – efektivní jízdy znamenají víc doručení za stejný čas."
        }
        Metric::ArrivalDelay => "Kvalita – včasný příjezd na depo zlepšuje plánování rozvozu.",
        Metric::InRideDelay => "Kvalita – méně zpoždění během rozvozu zvyšuje spolehlivost.",
        Metric::PeakDayRides => "Flexibilita – dostupnost v exponované dny zvyšuje využitelnost.",
        Metric::DoubledRides => "Produktivita – zdvojené jízdy zlepšují využití kapacity.",
        Metric::DeliveryQuality => {
            "Kvalita – standardy doručení přímo ovlivňují zkušenost zákazníka."
        }
    }
}

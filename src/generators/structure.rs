use super::types::{Format, Offer, OfferStack, Pricing, StackComponent, Structure, Upsell};

const FIRST_BONUS_VALUE: u32 = 47;
const SECOND_BONUS_VALUE: u32 = 27;

pub fn base_price(format: &Format) -> u32 {
    match format {
        Format::Pdf => 19,
        Format::Checklist => 9,
        Format::Template => 29,
        Format::Audio => 39,
        Format::Video => 49,
        Format::Worksheet => 19,
        Format::Other(_) => 19,
    }
}

pub fn generate_pricing(format: &Format) -> Pricing {
    let main = base_price(format);
    // floor(main * 1.5) and floor(main * 2.5) in integer arithmetic
    let suggested = main * 3 / 2;
    let premium = main * 5 / 2;
    Pricing {
        main,
        suggested,
        premium,
        strategy: format!(
            "Start at ${main} for quick validation, then test ${suggested} after first 10 sales"
        ),
    }
}

pub fn generate_bonuses(format: &Format) -> Vec<String> {
    let templates: [&str; 3] = match format {
        Format::Checklist => [
            "Progress Tracking Worksheet",
            "Success Metrics Dashboard",
            "Common Mistakes Avoider",
        ],
        Format::Template => [
            "Customization Guide",
            "Industry-Specific Examples",
            "Advanced Variations",
        ],
        _ => [
            "Quick Reference Cheat Sheet",
            "30-Day Implementation Calendar",
            "Troubleshooting FAQ Guide",
        ],
    };
    templates.iter().take(2).map(|bonus| bonus.to_string()).collect()
}

pub fn generate_upsells() -> Vec<Upsell> {
    vec![
        Upsell {
            title: "1-on-1 Implementation Call".to_string(),
            price: 97,
            description: "30-minute personalized strategy session".to_string(),
        },
        Upsell {
            title: "Advanced Mastery Course".to_string(),
            price: 197,
            description: "Deep-dive training with case studies".to_string(),
        },
    ]
}

pub fn generate_offer_stack(name: &str, pricing: &Pricing, bonuses: &[String]) -> OfferStack {
    let savings = FIRST_BONUS_VALUE + SECOND_BONUS_VALUE;
    let mut components = vec![StackComponent {
        item: name.to_string(),
        value: pricing.main,
    }];
    components.extend(
        bonuses
            .iter()
            .zip([FIRST_BONUS_VALUE, SECOND_BONUS_VALUE])
            .map(|(bonus, value)| StackComponent {
                item: bonus.clone(),
                value,
            }),
    );

    OfferStack {
        total_value: pricing.main + savings,
        your_price: pricing.main,
        savings,
        components,
    }
}

/// Pure in `offer.format` and `offer.name`.
pub fn generate_structure(offer: &Offer) -> Structure {
    let pricing = generate_pricing(&offer.format);
    let bonuses = generate_bonuses(&offer.format);
    let offer_stack = generate_offer_stack(&offer.name, &pricing, &bonuses);
    Structure {
        pricing,
        bonuses,
        upsells: generate_upsells(),
        offer_stack,
    }
}

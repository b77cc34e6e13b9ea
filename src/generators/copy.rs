use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use super::pick;
use super::types::{Offer, SalesCopy, Structure};

/// Price used on the sales page when no structure has been generated yet.
pub const DEFAULT_PRICE: u32 = 19;

const HOOKS: [&str; 4] = [
    "Stop letting [PAIN] steal your dreams.",
    "The secret that [AUDIENCE] don't want you to know:",
    "Warning: This will change how you think about [NICHE]",
    "Finally, a solution to [PAIN] that actually works.",
];

const AUDIENCE: &str = "successful people";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

pub fn fill_hook(template: &str, offer: &Offer) -> String {
    template
        .replacen("[PAIN]", &offer.pain_point.to_lowercase(), 1)
        .replacen("[AUDIENCE]", AUDIENCE, 1)
        .replacen("[NICHE]", &offer.niche.to_lowercase(), 1)
}

pub fn niche_hashtag(niche: &str) -> String {
    format!("#{}", WHITESPACE.replace_all(niche, ""))
}

pub fn generate_social_post<R: Rng>(offer: &Offer, rng: &mut R) -> String {
    let hook = fill_hook(pick(&HOOKS, rng), offer);
    format!(
        "{hook}\n\n{} gives you {}.\n\n✨ {}\n\nGet it here: [link]\n\n{} #DigitalProducts #Productivity",
        offer.name,
        offer.promise.to_lowercase(),
        offer.deliverable,
        niche_hashtag(&offer.niche),
    )
}

pub fn generate_cta_one_liner<R: Rng>(offer: &Offer, rng: &mut R) -> String {
    let pain = offer.pain_point.to_lowercase();
    let templates = [
        format!("Transform {pain} into your superpower"),
        format!("Get {} and change everything", offer.name.to_lowercase()),
        format!("Stop struggling with {pain} - start winning"),
        format!("The {} that solves {pain} forever", offer.format),
    ];
    let index = rng.random_range(0..templates.len());
    templates[index].clone()
}

pub fn generate_mini_sales_page(offer: &Offer, price: u32) -> String {
    let pain = offer.pain_point.to_lowercase();
    format!(
        "# The Problem That's Costing You Everything

{pain_point} isn't just frustrating - it's stealing your potential, your time, and your peace of mind.

Every day you wait is another day of missed opportunities.

## What if there was a better way?

{name} isn't just another {format}. It's a proven system that {promise}.

### What You Get:
- {deliverable}
- Step-by-step implementation guide
- Real-world examples and case studies
- 30-day money-back guarantee

**Normal Price: ${normal}**
**Your Price Today: ${price}**

Stop letting {pain} control your life.

Get {name} now and start your transformation today.

[GET INSTANT ACCESS - ${price}]

*Join hundreds of people who've already transformed their lives*",
        pain_point = offer.pain_point,
        name = offer.name,
        format = offer.format,
        promise = offer.promise.to_lowercase(),
        deliverable = offer.deliverable,
        normal = price * 2,
    )
}

pub fn generate_sales_copy<R: Rng>(
    offer: &Offer,
    structure: Option<&Structure>,
    rng: &mut R,
) -> SalesCopy {
    let price = structure.map_or(DEFAULT_PRICE, |structure| structure.pricing.main);
    SalesCopy {
        social_post: generate_social_post(offer, rng),
        cta_one_liner: generate_cta_one_liner(offer, rng),
        mini_sales_page: generate_mini_sales_page(offer, price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::structure::generate_structure;
    use crate::generators::types::Format;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn offer() -> Offer {
        Offer {
            niche: "Health & Fitness".to_string(),
            pain_point: "Low Energy".to_string(),
            format: Format::Video,
            name: "Quick Fit Daily Routine".to_string(),
            promise: "Transform low energy into your biggest strength with this proven video"
                .to_string(),
            deliverable: "Video tutorials with accompanying workbooks and action steps"
                .to_string(),
        }
    }

    #[test]
    fn hook_substitutes_placeholders() {
        let offer = offer();
        assert_eq!(
            fill_hook(HOOKS[0], &offer),
            "Stop letting low energy steal your dreams."
        );
        assert_eq!(
            fill_hook(HOOKS[1], &offer),
            "The secret that successful people don't want you to know:"
        );
        assert_eq!(
            fill_hook(HOOKS[2], &offer),
            "Warning: This will change how you think about health & fitness"
        );
    }

    #[test]
    fn hashtag_strips_whitespace() {
        assert_eq!(niche_hashtag("Health & Fitness"), "#Health&Fitness");
        assert_eq!(niche_hashtag("Creative  Arts\tDesign"), "#CreativeArtsDesign");
    }

    #[test]
    fn social_post_layout() {
        let post = generate_social_post(&offer(), &mut StdRng::seed_from_u64(1));
        assert!(post.contains("Quick Fit Daily Routine gives you transform low energy"));
        assert!(post.contains("✨ Video tutorials"));
        assert!(post.ends_with("#Health&Fitness #DigitalProducts #Productivity"));
        assert!(HOOKS
            .iter()
            .any(|hook| post.starts_with(&fill_hook(hook, &offer()))));
    }

    #[test]
    fn sales_page_defaults_price_without_structure() {
        let copy = generate_sales_copy(&offer(), None, &mut StdRng::seed_from_u64(3));
        assert!(copy.mini_sales_page.contains("**Normal Price: $38**"));
        assert!(copy.mini_sales_page.contains("**Your Price Today: $19**"));
        assert!(copy.mini_sales_page.contains("[GET INSTANT ACCESS - $19]"));
    }

    #[test]
    fn sales_page_uses_structure_price() {
        let offer = offer();
        let structure = generate_structure(&offer);
        let copy = generate_sales_copy(&offer, Some(&structure), &mut StdRng::seed_from_u64(3));
        assert!(copy.mini_sales_page.contains("**Normal Price: $98**"));
        assert!(copy.mini_sales_page.contains("isn't just another video."));
    }

    #[test]
    fn cta_mentions_offer() {
        let offer = offer();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let cta = generate_cta_one_liner(&offer, &mut rng);
            assert!(cta.contains("low energy") || cta.contains("quick fit daily routine"));
        }
    }
}

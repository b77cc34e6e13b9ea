use super::types::{Offer, PromoKit, PromoPost, VideoScript};

pub fn generate_video_scripts(offer: &Offer) -> Vec<VideoScript> {
    let pain = offer.pain_point.to_lowercase();
    let name = &offer.name;
    vec![
        VideoScript {
            id: 1,
            title: "Problem/Solution Hook".to_string(),
            duration: "30-60 seconds".to_string(),
            script: format!(
                "HOOK: \"If you're struggling with {pain}, this is for you...\"

PROBLEM: Show the pain and frustration
- Quick montage of the struggle
- Frustrated expressions
- \"Sound familiar?\"

SOLUTION: \"{name} changed everything for me\"
- Show transformation
- Quick results
- Happy/confident demeanor

CTA: \"Link in bio to get yours\"

CAPTION: \"The {format} that finally solved {pain} 🙌 #productivity #transformation\"",
                format = offer.format,
            ),
        },
        VideoScript {
            id: 2,
            title: "Social Proof Testimonial".to_string(),
            duration: "45-90 seconds".to_string(),
            script: format!(
                "HOOK: \"I can't believe this actually worked...\"

STORY: Share a success story
- \"I used to struggle with {pain}\"
- \"Then I found {name}\"
- \"Now I'm [specific result]\"

PROOF: Show before/after or results
- Screenshots
- Metrics
- Visual transformation

CTA: \"Get the same results - link below\"

CAPTION: \"Real results from {name} ✨ Who else needs this? #success #transformation\""
            ),
        },
        VideoScript {
            id: 3,
            title: "Quick Tip Preview".to_string(),
            duration: "30-45 seconds".to_string(),
            script: format!(
                "HOOK: \"Here's a quick tip from {name}...\"

VALUE: Share one actionable tip
- Quick, implementable advice
- Show it in action
- \"This is just one of [X] strategies inside\"

TEASE: \"But that's not all...\"
- Hint at more value
- Build curiosity
- Create desire

CTA: \"Full guide in my bio\"

CAPTION: \"Free tip from {name} 💡 Save for later! #tips #productivity\""
            ),
        },
    ]
}

pub fn generate_promo_posts(offer: &Offer) -> Vec<PromoPost> {
    let pain = offer.pain_point.to_lowercase();
    let name = &offer.name;
    vec![
        PromoPost {
            id: 1,
            platform: "Instagram/TikTok".to_string(),
            kind: "Story Hook".to_string(),
            content: format!(
                "POV: You finally found the solution to {pain}

{name} is literally a game-changer 🔥

Who else needs this? 👇

#productivity #transformation #digitalproducts"
            ),
        },
        PromoPost {
            id: 2,
            platform: "Twitter/X".to_string(),
            kind: "Thread Starter".to_string(),
            content: format!(
                "🧵 Thread: How I went from {pain} to [desired outcome] in [timeframe]

The secret? {name}

Here's exactly what I learned... (1/7)"
            ),
        },
        PromoPost {
            id: 3,
            platform: "LinkedIn".to_string(),
            kind: "Professional Angle".to_string(),
            content: format!(
                "{pain_point} was costing me opportunities.

Every day I delayed addressing this issue was another day of lost potential.

Then I discovered {name}.

The transformation wasn't overnight, but it was undeniable.

{promise}

Sometimes the best investment you can make is in solutions that eliminate your biggest friction points.

What's your biggest productivity challenge right now?",
                pain_point = offer.pain_point,
                promise = offer.promise,
            ),
        },
    ]
}

pub fn generate_promo_kit(offer: &Offer) -> PromoKit {
    PromoKit {
        video_scripts: generate_video_scripts(offer),
        social_posts: generate_promo_posts(offer),
    }
}

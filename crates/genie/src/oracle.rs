//! Scripted fallback oracle.
//!
//! Network-free and total: every input, including an absent message and an
//! empty menu, yields a non-empty line.

use ruchulu_core::menu::MenuItem;

pub const NO_SPECIALS: &str = "No specials left, so maybe try water?";
pub const HEAT_LINE: &str = "This is Andhra. Everything is hot. Bring tissues and bravery.";
pub const MILD_LINE: &str = "Mild? Cute. Try the punugulu and pretend they bite.";
pub const GENERIC_LINE: &str =
    "Ask me about dishes, spice levels, or why you should fear the chilli fryer.";

/// Answer from the latest user message without calling any provider.
pub fn fallback_reply(latest_user_message: Option<&str>, menu: &[MenuItem]) -> String {
    let lower = latest_user_message.unwrap_or_default().to_lowercase();

    if lower.contains("recommend") {
        return match recommend(menu) {
            Some(dish) => format!(
                "Fine. Order the {}. It will probably set your eyebrows on fire, but you'll thank me.",
                dish.name
            ),
            None => NO_SPECIALS.into(),
        };
    }

    if lower.contains("spice") || lower.contains("hot") {
        return HEAT_LINE.into();
    }

    if lower.contains("mild") {
        return MILD_LINE.into();
    }

    GENERIC_LINE.into()
}

/// First available dish, else the first dish at all.
fn recommend(menu: &[MenuItem]) -> Option<&MenuItem> {
    menu.iter().find(|dish| dish.available).or_else(|| menu.first())
}

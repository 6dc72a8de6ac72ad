// ── Indicator HTML scraping ──
//
// The scraping vendor embeds the boolean indicator list as an HTML
// fragment: a `.curraux-details` element whose `li` items each carry a
// `title` attribute ("Driver door open <br> 14:02") and a `div` whose
// class list encodes icon and state color:
//
//   <div class="io-icon t-io-door i-c-red io-state sep">
//
// Only items whose div has exactly five class tokens are real indicators;
// the portal uses shorter class lists for decorative entries.

use indexmap::IndexMap;
use scraper::{Html, Selector};

use crate::catalog::indicator_class;
use crate::model::BinaryIndicator;
use crate::normalize::label::{canonicalize_label, color_state};

/// Number of class tokens on a genuine indicator div.
const INDICATOR_CLASS_COUNT: usize = 5;

/// Parse the indicator fragment into `{label}_{slot}` keyed indicators.
/// Returns an empty map for fragments without an indicator list.
pub fn scrape_indicators(html: &str) -> IndexMap<String, BinaryIndicator> {
    // Static selectors; parse failure would be a programming error.
    let container_sel =
        Selector::parse(".curraux-details").expect("container selector is valid");
    let item_sel = Selector::parse("li").expect("item selector is valid");
    let div_sel = Selector::parse("div").expect("div selector is valid");

    let mut indicators = IndexMap::new();

    let fragment = Html::parse_fragment(html);
    let Some(container) = fragment.select(&container_sel).next() else {
        return indicators;
    };

    for (slot, item) in container.select(&item_sel).enumerate() {
        let Some(div) = item.select(&div_sel).next() else {
            continue;
        };
        let classes: Vec<&str> = div.value().classes().collect();
        if classes.len() != INDICATOR_CLASS_COUNT {
            continue;
        }
        let color = classes[2].replace("i-c-", "");

        let Some(title) = item.value().attr("title") else {
            continue;
        };
        let raw_label = title
            .split(" <br> ")
            .next()
            .unwrap_or(title)
            .to_lowercase();
        let label = canonicalize_label(&raw_label);

        indicators.insert(
            format!("{label}_{slot}"),
            BinaryIndicator {
                device_class: indicator_class(&label),
                active: color_state(&color),
                name: label,
                slot,
            },
        );
    }

    indicators
}

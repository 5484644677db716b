//! Turn one brand's payload into a display card.
//!
//! Rendering is a pure mapping from `(brand name, payload)` to a
//! [`Fragment`]. Items are shown in feed order; the renderer never sorts.
//! Markup lives in `templates/card.html`.

use crate::dates::format_date;
use crate::models::{FeedPayload, Item};
use askama::Template;
use chrono::TimeZone;

/// Length of the recent-items list. Items past this are dropped silently.
pub const RECENT_LIMIT: usize = 20;

/// One item as displayed: link text, target and formatted date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub title: String,
    pub url: String,
    pub date: String,
}

/// Sections of a card whose feed loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCard {
    pub latest: Option<ItemView>,
    pub recent: Vec<ItemView>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody {
    Failed(String),
    Loaded(LoadedCard),
}

/// A rendered card for one brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub brand: String,
    pub body: CardBody,
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    card: &'a Fragment,
}

impl Fragment {
    pub fn to_html(&self) -> askama::Result<String> {
        CardTemplate { card: self }.render()
    }
}

fn item_view<Tz>(item: &Item, tz: &Tz) -> ItemView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ItemView {
        title: item.title.clone(),
        url: item.url.clone(),
        date: format_date(item.publish_datetime.as_deref(), tz),
    }
}

/// Render a brand card.
///
/// A failed payload yields the heading and a single error line. A loaded
/// payload yields the latest item (or a placeholder), the first
/// [`RECENT_LIMIT`] items as an ordered list, and an "Updated" line when the
/// feed carries a generation time.
pub fn render<Tz>(brand_name: &str, payload: &FeedPayload, tz: &Tz) -> Fragment
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let body = match payload {
        FeedPayload::Failed { message } => CardBody::Failed(message.clone()),
        FeedPayload::Loaded {
            items,
            generated_at,
        } => CardBody::Loaded(LoadedCard {
            latest: items.first().map(|item| item_view(item, tz)),
            recent: items
                .iter()
                .take(RECENT_LIMIT)
                .map(|item| item_view(item, tz))
                .collect(),
            updated: generated_at
                .as_deref()
                .filter(|g| !g.is_empty())
                .map(|g| format_date(Some(g), tz)),
        }),
    };

    Fragment {
        brand: brand_name.to_string(),
        body,
    }
}

//! Plain-text rendering of feed cards and profile pages.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use findit_core::{age::time_since, item::Item, profile::ProfileView};

pub const EMPTY_FEED: &str = "No items found\nTry adjusting your search or filter.";

/// One item as a short card.
pub fn card(item: &Item, now: DateTime<Utc>) -> String {
  let status = item.status.as_ref().to_uppercase();
  let mut out = format!("[{status}] {} ({})\n", item.name, item.region);
  let _ = writeln!(
    out,
    "  {} · {} · by {}",
    item.location,
    time_since(item.reported_at, now),
    item.author.username
  );
  if !item.description.is_empty() {
    let _ = writeln!(out, "  {}", item.description);
  }
  let _ = writeln!(out, "  {}", item.image_url);
  out
}

/// A list of cards, or the empty-state message.
pub fn feed(items: &[&Item], now: DateTime<Utc>) -> String {
  if items.is_empty() {
    return format!("{EMPTY_FEED}\n");
  }
  items.iter().map(|item| card(item, now)).collect::<Vec<_>>().join("\n")
}

/// Confirmation for a new report, followed by the refreshed feed.
pub fn submitted(item: &Item, items: &[&Item], now: DateTime<Utc>) -> String {
  format!("Reported {} ({})\n\n{}", item.name, item.item_id, feed(items, now))
}

/// A profile page. `own` selects the first-person wording.
pub fn profile(view: &ProfileView, own: bool, now: DateTime<Utc>) -> String {
  let user = &view.user;
  let mut out = format!("{}\n", user.username);
  if let Some(email) = &user.email {
    let _ = writeln!(out, "  email: {email}");
  }
  if let Some(phone) = &user.phone {
    let _ = writeln!(out, "  phone: {phone}");
  }
  out.push('\n');

  if own {
    out.push_str("Your Reports\n");
  } else {
    let _ = writeln!(out, "Reports by {}", user.username);
  }

  if view.is_empty() {
    if own {
      out.push_str("You haven't reported any items yet.\n");
    } else {
      let _ = writeln!(out, "{} hasn't reported any items yet.", user.username);
    }
    return out;
  }

  let reports: Vec<&Item> = view.reports.iter().collect();
  out.push_str(&feed(&reports, now));
  out
}

use std::collections::BTreeMap;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::Event;

const PAGE_CSS: &str = r#"
    :root { --bg: #0f172a; --card: #1e293b; --text: #e2e8f0; --accent: #3b82f6; --live: #ef4444; }
    body { background: var(--bg); color: var(--text); font-family: system-ui, -apple-system, sans-serif; margin: 0; padding: 20px; }
    .navbar { display: flex; gap: 10px; overflow-x: auto; padding-bottom: 15px; margin-bottom: 20px; scrollbar-width: none; }
    .nav-btn { background: var(--card); color: var(--text); padding: 8px 16px; border-radius: 20px; text-decoration: none; border: 1px solid #334155; white-space: nowrap; font-size: 0.9rem; transition: 0.2s; }
    .nav-btn:hover { background: var(--accent); border-color: var(--accent); color: white; }
    .sport-section { margin-bottom: 40px; }
    .sport-title { font-size: 1.5rem; font-weight: bold; margin-bottom: 15px; border-left: 4px solid var(--accent); padding-left: 10px; text-transform: uppercase; letter-spacing: 1px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 15px; }
    .card { background: var(--card); border-radius: 12px; overflow: hidden; border: 1px solid #334155; box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.2); }
    .header { padding: 15px; background: rgba(0,0,0,0.2); display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid #334155; }
    .utc-time { font-family: monospace; color: #94a3b8; font-size: 0.9rem; background: #0f172a; padding: 2px 6px; border-radius: 4px; }
    .live-badge { background: var(--live); color: white; padding: 2px 8px; border-radius: 4px; font-size: 0.7rem; font-weight: bold; animation: pulse 2s infinite; display: inline-block; margin-left: 5px; }
    .teams { font-weight: 600; text-align: right; flex-grow: 1; margin-left: 10px; font-size: 0.95rem; }
    .channels { padding: 12px; display: flex; flex-wrap: wrap; gap: 8px; }
    .btn { background: #334155; color: white; padding: 8px 12px; border-radius: 6px; font-size: 0.85rem; cursor: pointer; display: flex; align-items: center; gap: 8px; transition: all 0.2s; user-select: none; border: 1px solid transparent; }
    .btn:hover { background: var(--accent); transform: translateY(-1px); border-color: #60a5fa; }
    .btn:active { transform: translateY(0); }
    .flag-img { width: 18px; height: 13px; object-fit: cover; border-radius: 2px; }
    .empty { text-align: center; padding: 50px; color: #94a3b8; }
    .footer { margin-top: 50px; text-align: center; color: #64748b; font-size: 0.8rem; border-top: 1px solid #334155; padding-top: 20px; }
    @keyframes pulse { 0% { opacity: 1; } 50% { opacity: 0.5; } 100% { opacity: 1; } }
"#;

// Links stay base64-encoded in the markup; the page decodes on click.
// Times are emitted as the stored UTC value and localized client-side.
const PAGE_JS: &str = r#"
    function openLink(el) {
        try {
            const raw = el.getAttribute('data-link');
            const url = atob(raw);
            window.open(url, '_blank');
        } catch (e) { console.error('bad link', e); }
    }
    document.querySelectorAll('.utc-time').forEach(el => {
        const raw = el.getAttribute('data-ts');
        if (raw) {
            const d = new Date(raw.replace(' ', 'T') + 'Z');
            if (!isNaN(d)) {
                el.innerText = d.toLocaleTimeString([], { hour: '2-digit', minute: '2-digit' });
            }
        }
    });
"#;

/// Section heading for a category tag, with an icon where we know one.
fn sport_title(category: &str) -> String {
    match category {
        "Soccer" => "Football ⚽".to_string(),
        "NBA" => "Basketball (NBA) 🏀".to_string(),
        "NFL" => "NFL 🏈".to_string(),
        "F1" => "Formula 1 🏎️".to_string(),
        "MotoGP" => "MotoGP 🏍️".to_string(),
        "Tennis" => "Tennis 🎾".to_string(),
        "Boxing" => "Boxing 🥊".to_string(),
        "Rugby" => "Rugby 🏉".to_string(),
        "Darts" => "Darts 🎯".to_string(),
        "Snooker" => "Snooker 🎱".to_string(),
        "Hockey" => "Hockey 🏒".to_string(),
        "Baseball" => "Baseball ⚾".to_string(),
        other => other.to_uppercase(),
    }
}

fn flag_url(region: &str) -> String {
    let code = region.to_lowercase();
    if code == "ppv" {
        "https://fav.farm/📺".to_string()
    } else {
        format!("https://flagcdn.com/24x18/{code}.png")
    }
}

/// Renders the full static page from the display-eligible groups. The
/// groups arrive pre-sorted from reconciliation; category order is the
/// map's key order.
pub fn render_page(groups: &BTreeMap<String, Vec<Event>>, generated_at: DateTime<Utc>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "MatchDay Hub ⚽" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                div class="navbar" {
                    @for category in groups.keys() {
                        a href=(format!("#{category}")) class="nav-btn" { (sport_title(category)) }
                    }
                }
                div id="content" {
                    @if groups.is_empty() {
                        div class="empty" { "😴 No events on right now." }
                    }
                    @for (category, events) in groups {
                        div id=(category) class="sport-section" {
                            div class="sport-title" { (sport_title(category)) }
                            div class="grid" {
                                @for event in events {
                                    (render_card(event))
                                }
                            }
                        }
                    }
                }
                div class="footer" {
                    "Last updated: " (generated_at.format("%d/%m/%Y %H:%M UTC"))
                }
                script { (PreEscaped(PAGE_JS)) }
            }
        }
    }
}

fn render_card(event: &Event) -> Markup {
    html! {
        div class="card" {
            div class="header" {
                div {
                    span class="utc-time" data-ts=(event.start) { (event.start) }
                    @if event.is_live() {
                        span class="live-badge" { "LIVE" }
                    }
                }
                span class="teams" {
                    (event.home_team)
                    span style="color:#64748b" { " vs " }
                    (event.away_team)
                }
            }
            div class="channels" {
                @for channel in &event.channels {
                    div class="btn" data-link=(BASE64.encode(&channel.link)) onclick="openLink(this)" {
                        img src=(flag_url(&channel.region)) class="flag-img" onerror="this.style.display='none'";
                        (channel.name)
                    }
                }
            }
        }
    }
}

/// Writes the rendered page, creating parent directories as needed.
pub fn write_page(path: &Path, markup: &Markup) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, markup.clone().into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channel;
    use chrono::TimeZone;

    fn groups_with_clasico() -> BTreeMap<String, Vec<Event>> {
        let event = Event {
            id: "abc".to_string(),
            category: "Soccer".to_string(),
            home_team: "FC Barcelona".to_string(),
            away_team: "Real Madrid".to_string(),
            start: "2026-02-01 20:00".to_string(),
            status: "live".to_string(),
            channels: vec![Channel {
                name: "Sports One".to_string(),
                link: "http://x/1".to_string(),
                region: "es".to_string(),
            }],
        };
        let mut groups = BTreeMap::new();
        groups.insert("Soccer".to_string(), vec![event]);
        groups
    }

    #[test]
    fn page_contains_card_teams_badge_and_encoded_link() {
        let generated = Utc.with_ymd_and_hms(2026, 2, 1, 20, 10, 0).unwrap();
        let page = render_page(&groups_with_clasico(), generated).into_string();
        assert!(page.contains("FC Barcelona"));
        assert!(page.contains("Real Madrid"));
        assert!(page.contains("live-badge"));
        assert!(page.contains(r#"data-ts="2026-02-01 20:00""#));
        assert!(page.contains(&BASE64.encode("http://x/1")));
        // Raw link never appears in the markup.
        assert!(!page.contains("http://x/1\""));
        assert!(page.contains("flagcdn.com/24x18/es.png"));
        assert!(page.contains("01/02/2026 20:10 UTC"));
    }

    #[test]
    fn empty_schedule_still_renders_a_page() {
        let generated = Utc.with_ymd_and_hms(2026, 2, 1, 20, 10, 0).unwrap();
        let page = render_page(&BTreeMap::new(), generated).into_string();
        assert!(page.contains("No events on right now"));
    }

    #[test]
    fn unknown_categories_fall_back_to_uppercase() {
        assert_eq!(sport_title("Kabaddi"), "KABADDI");
        assert_eq!(sport_title("Snooker"), "Snooker 🎱");
    }

    #[test]
    fn ppv_channels_get_the_tv_icon() {
        assert_eq!(flag_url("PPV"), "https://fav.farm/📺");
        assert_eq!(flag_url("uk"), "https://flagcdn.com/24x18/uk.png");
    }
}

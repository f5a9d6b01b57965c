//! HTML pages served by the frontend

use crate::views::{hidden_attr, html_escape, FeedMode, FeedState, PageNav, SightingCard};

/// Static bits the pages need besides feed state
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// URL prefix assets are served under
    pub assets_url: String,
    pub report_sighting_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            assets_url: "/assets".to_string(),
            report_sighting_url: "/reportsighting".to_string(),
        }
    }
}

pub fn profile_page(state: &FeedState, config: &PageConfig) -> String {
    let username = state
        .current_user
        .as_ref()
        .map(|u| html_escape(&u.username))
        .unwrap_or_else(|| "Loading".to_string());
    let sightings_count = state
        .current_user
        .as_ref()
        .map(|u| u.sightings_count.to_string())
        .unwrap_or_else(|| "Loading".to_string());
    let avatar = state
        .current_user
        .as_ref()
        .map(|u| {
            format!(
                r#"<img class="profile-image" alt="Profile Image" src="{}">"#,
                html_escape(&u.avatar_url())
            )
        })
        .unwrap_or_default();

    let notice = state
        .notice
        .as_ref()
        .map(|n| format!(r#"<div class="notice" data-testid="notice">{}</div>"#, html_escape(n)))
        .unwrap_or_default();

    let feed = if state.shows_empty_state() {
        empty_state(state.mode, config)
    } else {
        state
            .sightings
            .iter()
            .map(|s| {
                SightingCard::new(s, state.is_admin, state.card(s.id))
                    .render("/profile/cards", &config.assets_url)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let nav = if state.shows_page_nav() {
        PageNav::new(state.page, "/profile/page/previous", "/profile/page/next")
            .previous_disabled(state.page <= 1)
            .render()
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Profile - Whale Spotting</title>
    <style>{css}</style>
</head>
<body>
<div class="body">
    <div class="profile-pane">
        <div class="outer-container">
            <div class="inner-container">
                <h1 data-testid="username" class="heading">{username}</h1>
                <div class="trophy-container">
                    <p class="feature-text" data-testid="sightings-count">{sightings_count}</p>
                    <p class="reported little-text"> Reported <br> Sightings</p>
                    <img class="trophy-image" alt="Trophy Image" title="{rank}" data-testid="trophy" src="{assets}/{trophy}">
                </div>
                {avatar}
            </div>
            <div class="button-container">
                <form method="post" action="/profile/feed/{sightings_slug}">
                    <button type="submit" class="btn secondary" data-testid="sightings-toggle">Sightings</button>
                </form>
                <form method="post" action="/profile/feed/{approvals_slug}">
                    <button type="submit" class="btn secondary" data-testid="approval-toggle"{approvals_hidden}>Approvals</button>
                </form>
                <form method="post" action="/profile/admin/make">
                    <button type="submit" class="btn primary" data-testid="make-admin"{make_admin_hidden}>Make Admin</button>
                </form>
                <form method="post" action="/profile/admin/remove">
                    <button type="submit" class="btn primary" data-testid="remove-admin"{remove_admin_hidden}>Remove Admin</button>
                </form>
            </div>
        </div>
    </div>
    <div class="feed">
        <h2 class="heading" data-testid="feed-heading">{heading}</h2>
        {notice}
        <div class="card-holder">
{feed}
        </div>
        {nav}
    </div>
</div>
</body>
</html>"#,
        css = profile_css(),
        username = username,
        sightings_count = sightings_count,
        rank = state.rank,
        assets = config.assets_url,
        trophy = state.rank.trophy_image(),
        avatar = avatar,
        sightings_slug = FeedMode::Sightings.slug(),
        approvals_slug = FeedMode::Approvals.slug(),
        approvals_hidden = hidden_attr(!state.is_admin),
        make_admin_hidden = hidden_attr(state.is_admin),
        remove_admin_hidden = hidden_attr(!state.is_admin),
        heading = state.heading(),
        notice = notice,
        feed = feed,
        nav = nav,
    )
}

fn empty_state(mode: FeedMode, config: &PageConfig) -> String {
    match mode {
        FeedMode::Sightings => format!(
            r#"<div class="card-component" data-testid="empty-state">Nothing here, <a href="{}"> report a sighting </a></div>"#,
            html_escape(&config.report_sighting_url)
        ),
        FeedMode::Approvals => {
            r#"<div class="card-component" data-testid="empty-state">No sightings are waiting for approval.</div>"#
                .to_string()
        }
    }
}

/// Page shown after leaving the profile
pub fn left_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Whale Spotting</title>
    <style>{}</style>
</head>
<body>
    <div class="feed">
        <h2 class="heading">You have left your profile.</h2>
        <p><a href="/profile">Back to your profile</a></p>
    </div>
</body>
</html>"#,
        profile_css()
    )
}

fn profile_css() -> &'static str {
    r#"
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #0b2545;
            min-height: 100vh;
            color: #fff;
        }
        .body { display: flex; flex-wrap: wrap; gap: 2rem; padding: 2rem; }
        .profile-pane { flex: 1 1 300px; }
        .outer-container, .card-component {
            background: rgba(255,255,255,0.05);
            border-radius: 12px;
            padding: 1.5rem;
            border: 1px solid rgba(255,255,255,0.1);
        }
        .heading { margin-bottom: 1rem; }
        .trophy-container { display: flex; align-items: center; gap: 1rem; }
        .feature-text { font-size: 2rem; font-weight: bold; }
        .little-text { font-size: 0.85rem; color: #a0a0a0; }
        .trophy-image { width: 48px; height: 48px; }
        .profile-image { width: 160px; border-radius: 50%; margin-top: 1rem; }
        .button-container { display: flex; flex-wrap: wrap; gap: 0.5rem; margin-top: 1rem; }
        .btn {
            border: none;
            border-radius: 8px;
            padding: 0.6rem 1.2rem;
            font-weight: 600;
            cursor: pointer;
        }
        .btn.primary { background: #13a89e; color: #fff; }
        .btn.secondary { background: #8da9c4; color: #0b2545; }
        .btn.reject { background: #e74c3c; color: #fff; }
        .btn[disabled] { opacity: 0.4; cursor: default; }
        .min-width-25 { min-width: 25%; }
        [hidden] { display: none !important; }
        .feed { flex: 2 1 500px; }
        .card-holder { display: flex; flex-direction: column; gap: 1rem; }
        .sighting-card { display: flex; flex-direction: column; gap: 0.5rem; }
        .pending { color: #f1c40f; font-weight: bold; }
        .card-summary {
            display: flex;
            gap: 1rem;
            width: 100%;
            background: none;
            border: none;
            color: inherit;
            text-align: left;
            cursor: pointer;
        }
        .card-summary span { display: block; }
        .species-image { width: 96px; height: 96px; object-fit: cover; border-radius: 8px; }
        .second-column.closed { display: none; }
        .second-column.open { display: block; margin-top: 0.75rem; }
        .buttons-container { display: flex; gap: 0.5rem; justify-content: flex-end; }
        .notice { background: rgba(231,76,60,0.2); border-radius: 8px; padding: 0.75rem; margin-bottom: 1rem; }
        .page-nav { display: flex; align-items: center; justify-content: center; gap: 1rem; margin-top: 1rem; }
        a { color: #8da9c4; }
    "#
}

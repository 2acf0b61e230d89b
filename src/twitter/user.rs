//! Public profile projection of Twitter users.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::entities::extract_entities;
use super::format::format_counter;
use super::text::{anchor, profile_url, render_text};
use super::types::RawUser;
use crate::error::RenderError;

/// A bare `@handle` that is not already the label of a link or part of a path.
/// Handles are ASCII only.
static RESIDUAL_HANDLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9_>/@])@([A-Za-z0-9_]{1,15})(?-u:\b)")
        .expect("residual handle pattern is valid")
});

/// The display-safe projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedUser {
    pub name: String,
    pub handle: String,
    pub user_url: String,
    pub profile_img: String,
    pub description: String,
    pub verified: bool,
    pub following: bool,
    pub followers_count: String,
    pub friends_count: String,
}

/// Projects a raw user into its rendered profile.
///
/// The description is rendered with the user's own description entities and
/// any leftover `@handle` is then linked as well, since profiles often omit
/// mention entities. Authors of nested quotes get a description without links.
pub fn project_user(user: &RawUser, nested: bool) -> Result<RenderedUser, RenderError> {
    let entities = extract_entities(&user.entities.description);
    let description = render_text(&user.description, &entities, None, nested)?;
    let description = if nested {
        description
    } else {
        link_residual_handles(&description)
    };

    Ok(RenderedUser {
        name: user.name.clone(),
        handle: format!("@{}", user.screen_name),
        user_url: profile_url(&user.screen_name),
        profile_img: user.profile_image_url_https.clone(),
        description,
        verified: user.verified,
        following: user.following,
        followers_count: format_counter(user.followers_count),
        friends_count: format_counter(user.friends_count),
    })
}

fn link_residual_handles(description: &str) -> String {
    RESIDUAL_HANDLE_RE
        .replace_all(description, |caps: &regex::Captures| {
            let handle = &caps[2];
            format!(
                "{}{}",
                &caps[1],
                anchor(&profile_url(handle), &format!("@{}", handle))
            )
        })
        .into_owned()
}

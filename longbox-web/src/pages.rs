//! HTML page assembly
//!
//! Builds the browsing site from compile-time-embedded templates and
//! the loaded collections. Unknown codes render the not-found page;
//! internal failures answer 500 with the error text in the `error`
//! header, like the JSON API.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};

use longbox_common::model::{Comic, Namable, NamableList};
use longbox_common::{ranges, Result};

use crate::api::error_response;
use crate::menu;
use crate::store::{Dimension, Store};
use crate::template::fill;
use crate::AppState;

// Templates, embedded at compile time
const TEMPLATE: &str = include_str!("../static/template.html");
const CONTENT: &str = include_str!("../static/content.html");
const CONTENT_FISSUE: &str = include_str!("../static/content-fissue.html");
const CONTENT_ISSUE: &str = include_str!("../static/content-issue.html");
const A_LINK: &str = include_str!("../static/a-link.html");
const LIST_ITEM: &str = include_str!("../static/list.html");
const UNORDERED_LIST: &str = include_str!("../static/ul.html");
const COLUMN: &str = include_str!("../static/div-left.html");
const HEADING: &str = include_str!("../static/h6.html");
const CLEAR_FIX: &str = include_str!("../static/clear-fix.html");
const INTRO: &str = include_str!("../static/intro.html");
const ABOUT: &str = include_str!("../static/about.html");
const NOT_FOUND: &str = include_str!("../static/not-found.html");

// Nav tab positions
const TAB_INTRO: i32 = 0;
const TAB_CHARACTERS: i32 = 1;
const TAB_PHASES: i32 = 2;
const TAB_EVENTS: i32 = 3;
const TAB_CREATORS: i32 = 4;
const TAB_ABOUT: i32 = 5;
const TAB_NONE: i32 = -1;

// Handlers

pub async fn index(State(state): State<AppState>) -> Response {
    html_response(index_page(&state.store))
}

pub async fn about(State(state): State<AppState>) -> Response {
    html_response(about_page(&state.store))
}

pub async fn phase_fissues(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    html_response(fissues_page(&state.store, Dimension::Phases, &id, TAB_PHASES))
}

pub async fn event_fissues(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    html_response(fissues_page(&state.store, Dimension::Events, &id, TAB_EVENTS))
}

pub async fn character_fissues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    html_response(fissues_page(
        &state.store,
        Dimension::Characters,
        &id,
        TAB_CHARACTERS,
    ))
}

pub async fn creator_fissues(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    html_response(fissues_page(
        &state.store,
        Dimension::Creators,
        &id,
        TAB_CREATORS,
    ))
}

pub async fn creators_index(State(state): State<AppState>) -> Response {
    html_response(creators_page(&state.store))
}

pub async fn group_issues(
    State(state): State<AppState>,
    Path((id, sort_id)): Path<(String, String)>,
) -> Response {
    html_response(issues_page(&state.store, &id, &sort_id))
}

fn html_response(result: Result<String>) -> Response {
    match result {
        Ok(body) => Html(body).into_response(),
        Err(e) => error_response(&e),
    }
}

// Page builders

fn index_page(store: &Store) -> Result<String> {
    let menu = load_menu(store)?;
    Ok(render(&menu, INTRO, TAB_INTRO))
}

fn about_page(store: &Store) -> Result<String> {
    let menu = load_menu(store)?;
    Ok(render(&menu, ABOUT, TAB_ABOUT))
}

fn fissues_page(store: &Store, dimension: Dimension, id: &str, active_tab: i32) -> Result<String> {
    let menu = load_menu(store)?;
    let Some(fissues) = store.fissues_by_id(dimension, id)? else {
        return Ok(render(&menu, NOT_FOUND, TAB_NONE));
    };

    let mut body = String::new();
    for group in &fissues.list {
        let mut comic_list = String::new();
        for entry in ranges::compact(&group.comics) {
            comic_list.push_str(&fill(HEADING, &[&entry]));
        }
        let year = year_of(&group.date);
        let (character_id, character_name) = group
            .character
            .as_ref()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .unwrap_or(("", ""));
        body.push_str(&fill(
            CONTENT_FISSUE,
            &[
                &group.phase_id,
                &group.sort_id,
                &group.pic,
                &group.title,
                year,
                character_id,
                character_name,
                &group.phase_id,
                &group.sort_id,
                &group.title,
                &comic_list,
            ],
        ));
    }
    body.push_str(CLEAR_FIX);
    let content = fill(CONTENT, &[&fissues.namable.name, &body]);
    Ok(render(&menu, &content, active_tab))
}

fn issues_page(store: &Store, phase_id: &str, sort_id: &str) -> Result<String> {
    let menu = load_menu(store)?;
    let issues = store.comics_by_group(phase_id, sort_id)?;
    let Some(first) = issues.first() else {
        return Ok(render(&menu, NOT_FOUND, TAB_NONE));
    };

    let mut body = String::new();
    for comic in &issues {
        body.push_str(&issue_card(comic));
    }
    body.push_str(CLEAR_FIX);
    let content = fill(CONTENT, &[&first.title, &body]);
    Ok(render(&menu, &content, TAB_NONE))
}

fn creators_page(store: &Store) -> Result<String> {
    let menu = load_menu(store)?;
    let mut creators = store.list_namables(Dimension::Creators)?;
    menu::sort_by_name(&mut creators);

    let mut body = String::new();
    for column in menu::columns(&creators, 8) {
        let mut items = String::new();
        for creator in &column {
            let link = fill(A_LINK, &["creators", &creator.id, &creator.name]);
            items.push_str(&fill(LIST_ITEM, &[&link]));
        }
        let list = fill(UNORDERED_LIST, &[&items]);
        body.push_str(&fill(COLUMN, &[&list]));
    }
    let content = fill(CONTENT, &["Creators", &body]);
    Ok(render(&menu, &content, TAB_CREATORS))
}

fn issue_card(comic: &Comic) -> String {
    let name = format!("{} vol. {} #{}", comic.collection, comic.vol, comic.num);
    let essential = if comic.essential { "YES" } else { "NO" };
    let characters = namable_links(&comic.characters, "characters");
    let creators = namable_links(&comic.creators, "creators");
    let display_event = if comic.event.is_empty() { "none" } else { "block" };
    let display_comments = if comic.comments.is_empty() { "none" } else { "block" };
    let mut comment_list = String::new();
    for comment in &comic.comments {
        comment_list.push_str(&fill(LIST_ITEM, &[comment.trim()]));
    }
    let vol = comic.vol.to_string();
    let num = comic.num.to_string();
    fill(
        CONTENT_ISSUE,
        &[
            &name,
            &comic.pic,
            &name,
            &comic.collection,
            &vol,
            &num,
            &comic.date,
            &comic.universe,
            &comic.phase_id,
            &comic.phase_name,
            display_event,
            display_event,
            &comic.event_id,
            &comic.event,
            essential,
            &characters,
            &creators,
            display_comments,
            &comment_list,
        ],
    )
}

fn namable_links(list: &[Namable], link: &str) -> String {
    list.iter()
        .map(|namable| fill(A_LINK, &[link, &namable.id, &namable.name]))
        .collect::<Vec<_>>()
        .join(", ")
}

fn year_of(date: &str) -> &str {
    if date.len() >= 4 {
        &date[..4]
    } else {
        ""
    }
}

// Shared shell

struct Menu {
    phases: NamableList,
    events: NamableList,
    characters: NamableList,
}

fn load_menu(store: &Store) -> Result<Menu> {
    let phases = store.list_namables(Dimension::Phases)?;
    let events = store.list_namables(Dimension::Events)?;
    let mut characters = store.list_namables(Dimension::Characters)?;
    menu::sort_by_name(&mut characters);
    Ok(Menu {
        phases,
        events,
        characters,
    })
}

/// Fill the page shell: tab active flags, the three dropdown menus, and
/// the page content, in template order.
fn render(menu: &Menu, content: &str, active_tab: i32) -> String {
    let characters = menu_columns(&menu.characters, 8, "characters", false);
    let phases = menu_columns(&menu.phases, 3, "phases", true);
    let events = menu_columns(&menu.events, 3, "events", false);

    let mut active = [""; 6];
    if (0..6).contains(&active_tab) {
        active[active_tab as usize] = "active";
    }

    let mut args: Vec<&str> = Vec::with_capacity(21);
    args.push(active[0]);
    args.push(active[1]);
    args.extend(characters.iter().map(String::as_str));
    args.push(active[2]);
    args.extend(phases.iter().map(String::as_str));
    args.push(active[3]);
    args.extend(events.iter().map(String::as_str));
    args.push(active[4]);
    args.push(active[5]);
    args.push(content);
    fill(TEMPLATE, &args)
}

/// Build the `<li>` lists of one dropdown, one string per column.
/// Phase entries are numbered through the whole list, not per column.
fn menu_columns(namables: &[Namable], n: usize, link: &str, show_ordinal: bool) -> Vec<String> {
    let mut columns = Vec::with_capacity(n);
    let mut ordinal = 0;
    for column in menu::columns(namables, n) {
        let mut items = String::new();
        for namable in &column {
            ordinal += 1;
            let label = if show_ordinal {
                format!("{} - {}", ordinal, namable.name)
            } else {
                namable.name.clone()
            };
            let link_html = fill(A_LINK, &[link, &namable.id, &label]);
            items.push_str(&fill(LIST_ITEM, &[&link_html]));
        }
        columns.push(items);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use longbox_common::model::IssueNumber;

    #[test]
    fn test_issue_card_renders_issue_name_and_links() {
        let comic = Comic {
            id: "100".to_string(),
            collection: "Amazing".to_string(),
            title: "Origins".to_string(),
            vol: 1,
            num: IssueNumber(4.1),
            characters: vec![Namable {
                id: "001".to_string(),
                name: "Iron Man".to_string(),
            }],
            phase_id: "001".to_string(),
            phase_name: "Phase One".to_string(),
            sort_id: "001".to_string(),
            ..Comic::default()
        };
        let card = issue_card(&comic);
        assert!(card.contains("Amazing vol. 1 #4.1"));
        assert!(card.contains("<a href=\"/characters/001\">Iron Man</a>"));
        // No event: the event row is hidden
        assert!(card.contains("display:none"));
    }

    #[test]
    fn test_menu_columns_number_phases_through_the_list() {
        let namables: NamableList = (1..=4)
            .map(|i| Namable {
                id: format!("{:03}", i),
                name: format!("Phase {}", i),
            })
            .collect();
        let columns = menu_columns(&namables, 3, "phases", true);
        assert_eq!(columns.len(), 3);
        assert!(columns[0].contains("1 - Phase 1"));
        assert!(columns[0].contains("2 - Phase 2"));
        assert!(columns[1].contains("3 - Phase 3"));
        assert!(columns[2].contains("4 - Phase 4"));
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of("2009-06-17"), "2009");
        assert_eq!(year_of(""), "");
    }

    #[test]
    fn test_render_marks_active_tab() {
        let menu = Menu {
            phases: Vec::new(),
            events: Vec::new(),
            characters: Vec::new(),
        };
        let page = render(&menu, "<p>hello</p>", TAB_ABOUT);
        assert!(page.contains("<p>hello</p>"));
        assert!(page.contains("class=\"active\""));
    }
}

//! The builtin command set.
//!
//! Each builtin is an ordinary registration: an exact or prefix matcher
//! plus a handler that either renders locally (`help`) or submits a
//! remote job and returns. Completed remote calls come back through the
//! outcome channel and are rendered by [`render_outcome`] — handlers never
//! wait on the network.

use crate::console::output::{OutputLog, OutputSink, Palette};
use crate::console::registry::{CommandRegistry, CommandSpec};
use crate::console::session::Session;
use crate::remote::worker::{CallOutcome, RemoteJob, RenderKind};
use crate::remote::{Action, ApiRequest};


/// Register the stock commands, in their canonical order.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(help_command());
    registry.register(tag_command());
    registry.register(tags_command());
    registry.register(link_command());
    registry.register(links_command());
    registry.register(later_command());
    registry.register(laters_command());
    registry.register(note_command());
    registry.register(notes_command());
    registry.register(flag_command());
}


// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

/// `help` — lists every registered usage, padded into two columns.
fn help_command() -> CommandSpec {
    CommandSpec::new("help", "show help/usage information")
        .test(|_raw, clean| clean == "help")
        .execute(|_raw, _clean, registry, session| {
            let width = registry
                .entries()
                .iter()
                .map(|r| r.usage.chars().count())
                .max()
                .unwrap_or(0);
            let mut lines: Vec<String> = registry
                .entries()
                .iter()
                .map(|r| format!("{:<width$}  {}", r.usage, r.description, width = width))
                .collect();
            lines.sort();
            session.output.write_all(&lines, None, false);
        })
}

/// `tag <t1> <t2> ...` — attach tags to the current page.
fn tag_command() -> CommandSpec {
    CommandSpec::new("tag [<tag> [<tag> ...]]", "attach tags to this url (public)")
        .test(|_raw, clean| clean.starts_with("tag "))
        .execute(|raw, _clean, _registry, session| {
            let tags = words_after_command(raw);
            let request = ApiRequest::new(Action::AddTags)
                .url(&session.page_url)
                .installation_id(session.installation_id.clone())
                .tags(tags);
            submit(session, RenderKind::TagsAdded, request);
        })
}

/// `tags` — list the current page's tags.
fn tags_command() -> CommandSpec {
    CommandSpec::new("tags", "show tags for this url")
        .test(|_raw, clean| clean == "tags")
        .execute(|_raw, _clean, _registry, session| {
            let request = ApiRequest::new(Action::GetTags)
                .url(&session.page_url)
                .installation_id(session.installation_id.clone());
            submit(session, RenderKind::TagsListed, request);
        })
}

/// `link <url>` — link the current page to another URL. Everything after
/// the command word is concatenated with no separator, which heals a URL
/// pasted with stray spaces.
fn link_command() -> CommandSpec {
    CommandSpec::new("link <url>", "links this url to another url")
        .test(|_raw, clean| clean.starts_with("link "))
        .execute(|raw, _clean, _registry, session| {
            let link: String = raw.split_whitespace().skip(1).collect();
            let request = ApiRequest::new(Action::AddLink)
                .url(&session.page_url)
                .installation_id(session.installation_id.clone())
                .link(&link);
            submit(session, RenderKind::LinkAdded, request);
        })
}

/// `links` — list URLs linked with the current page. Public: no identity.
fn links_command() -> CommandSpec {
    CommandSpec::new("links", "show urls this url is linked with")
        .test(|_raw, clean| clean == "links")
        .execute(|_raw, _clean, _registry, session| {
            let request = ApiRequest::new(Action::GetLinks).url(&session.page_url);
            submit(session, RenderKind::LinksListed, request);
        })
}

/// `later` / `l` — save the current page to the reading list.
fn later_command() -> CommandSpec {
    CommandSpec::new("later | l", "saves url to reading list for later")
        .test(|_raw, clean| clean == "later" || clean == "l")
        .execute(|_raw, _clean, _registry, session| {
            let request = ApiRequest::new(Action::AddReadLater)
                .url(&session.page_url)
                .installation_id(session.installation_id.clone());
            submit(session, RenderKind::LaterSaved, request);
        })
}

/// `laters [<q>]` / `ls [<q>]` — show the reading list, optionally
/// filtered. The reading list spans pages, so no URL is sent.
fn laters_command() -> CommandSpec {
    CommandSpec::new(
        "laters [<query>] | ls [<query>]",
        "shows reading list, optionally searching for <query>",
    )
    .test(|_raw, clean| {
        clean == "laters"
            || clean == "ls"
            || clean.starts_with("laters ")
            || clean.starts_with("ls ")
    })
    .execute(|raw, _clean, _registry, session| {
        let request = ApiRequest::new(Action::GetReadLater)
            .installation_id(session.installation_id.clone())
            .search(query_after_command(raw));
        submit(session, RenderKind::LatersListed, request);
    })
}

/// `note <text>` / `n <text>` — attach a note to the current page.
fn note_command() -> CommandSpec {
    CommandSpec::new("note <note> | n <note>", "adds a text note to this url (public)")
        .test(|_raw, clean| clean.starts_with("note ") || clean.starts_with("n "))
        .execute(|raw, _clean, _registry, session| {
            let note = text_after_command(raw);
            let request = ApiRequest::new(Action::AddNote)
                .url(&session.page_url)
                .installation_id(session.installation_id.clone())
                .note(&note);
            submit(session, RenderKind::NoteAdded, request);
        })
}

/// `notes [<q>]` / `ns [<q>]` — show the current page's notes.
fn notes_command() -> CommandSpec {
    CommandSpec::new(
        "notes [<query>] | ns [<query>]",
        "shows all notes for this url (search optional)",
    )
    .test(|_raw, clean| {
        clean == "notes"
            || clean == "ns"
            || clean.starts_with("notes ")
            || clean.starts_with("ns ")
    })
    .execute(|raw, _clean, _registry, session| {
        let request = ApiRequest::new(Action::GetNotes)
            .url(&session.page_url)
            .installation_id(session.installation_id.clone())
            .search(query_after_command(raw));
        submit(session, RenderKind::NotesListed, request);
    })
}

/// `flag <text>` — flag a note on the current page as inappropriate.
fn flag_command() -> CommandSpec {
    CommandSpec::new("flag <note>", "flags a note on this url as inappropriate")
        .test(|_raw, clean| clean.starts_with("flag "))
        .execute(|raw, _clean, _registry, session| {
            let note = text_after_command(raw);
            let request = ApiRequest::new(Action::FlagNote)
                .url(&session.page_url)
                .installation_id(session.installation_id.clone())
                .note(&note);
            submit(session, RenderKind::NoteFlagged, request);
        })
}


// ---------------------------------------------------------------------------
// Outcome rendering
// ---------------------------------------------------------------------------

/// Render one completed remote call into the output log. Failed results
/// and transport errors become a single error-colored line; success is
/// rendered per command.
pub fn render_outcome(output: &mut OutputLog, palette: &Palette, outcome: CallOutcome) {
    let response = match outcome.result {
        Ok(response) if response.is_success() => response,
        Ok(response) => {
            output.write_line(&format!("Error: {}", response.result), Some(palette.error));
            return;
        }
        Err(status) => {
            output.write_line(&format!("Error: {}", status), Some(palette.error));
            return;
        }
    };

    match outcome.kind {
        RenderKind::TagsAdded | RenderKind::TagsListed => {
            let tags: Vec<String> = response.data.iter().filter_map(|r| r.tag.clone()).collect();
            if tags.is_empty() {
                output.write_line("Sorry, this URL does not have any tags.", None);
            } else {
                output.write_line(&tags.join(" "), None);
            }
        }
        RenderKind::LinkAdded => {
            let links: Vec<String> = response.data.iter().filter_map(|r| r.link.clone()).collect();
            output.write_line(&format!("Links: {}", links.join(" ")), None);
        }
        RenderKind::LinksListed => {
            let urls: Vec<String> = response.data.iter().filter_map(|r| r.url.clone()).collect();
            output.write_all(&urls, None, false);
        }
        RenderKind::LaterSaved => {
            output.write_line(
                &format!("Reading list now contains {} items.", response.data.len()),
                None,
            );
        }
        RenderKind::LatersListed => {
            if response.data.is_empty() {
                output.write_line("Sorry, this URL does not have any linked URLs.", None);
            } else {
                let lines: Vec<String> = response
                    .data
                    .iter()
                    .filter_map(|r| {
                        r.url
                            .as_ref()
                            .map(|url| format!("{} [ {} ]", url, r.tag_list.join(" ")))
                    })
                    .collect();
                output.write_all(&lines, None, false);
            }
        }
        RenderKind::NoteAdded => {
            output.write_line("Note has been added successfully.", None);
        }
        RenderKind::NotesListed => {
            if response.data.is_empty() {
                output.write_line("Sorry, this URL does not have any notes.", None);
            } else {
                let lines: Vec<String> = response
                    .data
                    .iter()
                    .filter_map(|r| {
                        r.note.as_ref().map(|note| {
                            format!("\"{}\"  {}", note, r.created_dt.as_deref().unwrap_or(""))
                        })
                    })
                    .collect();
                output.write_all(&lines, None, false);
            }
        }
        RenderKind::NoteFlagged => {
            output.write_line("Thanks for flagging!", Some(palette.error));
        }
    }
}


// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Submit a job; a dead worker degrades to an ordinary error line.
fn submit(session: &mut Session, kind: RenderKind, request: ApiRequest) {
    if let Err(status) = session.remote.submit(RemoteJob { kind, request }) {
        let error = session.palette.error;
        session.output.write_line(&format!("Error: {}", status), Some(error));
    }
}

/// The words after the command word.
fn words_after_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().skip(1).map(str::to_string).collect()
}

/// The text after the command word, single-spaced.
fn text_after_command(raw: &str) -> String {
    words_after_command(raw).join(" ")
}

/// The optional query after the command word; `None` when absent.
fn query_after_command(raw: &str) -> Option<String> {
    let query = text_after_command(raw);
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::dispatch;
    use crate::remote::worker::RemoteHandle;
    use crate::remote::{ApiResponse, Record};
    use std::sync::mpsc;

    fn builtin_registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        registry
    }

    fn session_with_jobs(id: Option<&str>) -> (Session, mpsc::Receiver<RemoteJob>) {
        let (handle, jobs) = RemoteHandle::detached();
        let session = Session::new(
            "https://example.org/article",
            id.map(str::to_string),
            handle,
        );
        (session, jobs)
    }

    /// Usages of all registrations matching the given input.
    fn matching(registry: &CommandRegistry, input: &str) -> Vec<String> {
        let clean = input.trim().to_lowercase();
        registry
            .entries()
            .iter()
            .filter(|r| r.matches(input, &clean))
            .map(|r| r.usage.clone())
            .collect()
    }

    // --- Match rules ---

    #[test]
    fn match_table() {
        let registry = builtin_registry();
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("help", vec!["help"]),
            ("tag rust tui", vec!["tag [<tag> [<tag> ...]]"]),
            ("tags", vec!["tags"]),
            ("link https://other.example/", vec!["link <url>"]),
            ("links", vec!["links"]),
            ("later", vec!["later | l"]),
            ("l", vec!["later | l"]),
            ("laters", vec!["laters [<query>] | ls [<query>]"]),
            ("ls", vec!["laters [<query>] | ls [<query>]"]),
            ("laters rust", vec!["laters [<query>] | ls [<query>]"]),
            ("ls rust", vec!["laters [<query>] | ls [<query>]"]),
            ("note remember this", vec!["note <note> | n <note>"]),
            ("n remember this", vec!["note <note> | n <note>"]),
            ("notes", vec!["notes [<query>] | ns [<query>]"]),
            ("ns", vec!["notes [<query>] | ns [<query>]"]),
            ("notes rust", vec!["notes [<query>] | ns [<query>]"]),
            ("ns rust", vec!["notes [<query>] | ns [<query>]"]),
            ("flag spam note", vec!["flag <note>"]),
            ("bogus", vec![]),
            ("tag", vec![]),   // bare word is not the prefix form
            ("tagx y", vec![]),
            ("linkage z", vec![]),
        ];
        for (input, expected) in cases {
            assert_eq!(matching(&registry, input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn matching_is_case_insensitive_via_normalization() {
        let registry = builtin_registry();
        assert_eq!(matching(&registry, "  TAGS  "), vec!["tags".to_string()]);
        assert_eq!(
            matching(&registry, "Tag Foo"),
            vec!["tag [<tag> [<tag> ...]]".to_string()]
        );
    }

    // --- Request shapes ---

    #[test]
    fn tag_submits_add_tags_with_raw_words() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(Some("deadbeef"));

        assert!(dispatch::process_input(&registry, &mut session, "tag Rust TUI"));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.kind, RenderKind::TagsAdded);
        assert_eq!(job.request.action, Action::AddTags);
        assert_eq!(job.request.url.as_deref(), Some("https://example.org/article"));
        assert_eq!(job.request.installation_id.as_deref(), Some("deadbeef"));
        // Tags come from the raw input, case preserved.
        assert_eq!(job.request.tags, vec!["Rust", "TUI"]);
        assert!(jobs.try_recv().is_err(), "exactly one job expected");
    }

    #[test]
    fn tags_submits_get_tags() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(Some("deadbeef"));

        assert!(dispatch::process_input(&registry, &mut session, "tags"));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.kind, RenderKind::TagsListed);
        assert_eq!(job.request.action, Action::GetTags);
        assert_eq!(job.request.url.as_deref(), Some("https://example.org/article"));
        assert!(job.request.tags.is_empty());
    }

    #[test]
    fn link_concatenates_argument_without_separator() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(None);

        assert!(dispatch::process_input(
            &registry,
            &mut session,
            "link https://other.example /deep /path"
        ));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.request.action, Action::AddLink);
        assert_eq!(
            job.request.link.as_deref(),
            Some("https://other.example/deep/path")
        );
    }

    #[test]
    fn links_is_public_and_sends_no_identity() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(Some("deadbeef"));

        assert!(dispatch::process_input(&registry, &mut session, "links"));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.request.action, Action::GetLinks);
        assert!(job.request.installation_id.is_none());
        assert_eq!(job.request.url.as_deref(), Some("https://example.org/article"));
    }

    #[test]
    fn later_and_l_are_equivalent() {
        let registry = builtin_registry();
        for input in ["later", "l"] {
            let (mut session, jobs) = session_with_jobs(Some("deadbeef"));
            assert!(dispatch::process_input(&registry, &mut session, input));
            let job = jobs.try_recv().unwrap();
            assert_eq!(job.kind, RenderKind::LaterSaved);
            assert_eq!(job.request.action, Action::AddReadLater);
            assert_eq!(job.request.installation_id.as_deref(), Some("deadbeef"));
        }
    }

    #[test]
    fn laters_sends_query_and_no_url() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(Some("deadbeef"));

        assert!(dispatch::process_input(&registry, &mut session, "ls rust async"));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.kind, RenderKind::LatersListed);
        assert_eq!(job.request.action, Action::GetReadLater);
        assert_eq!(job.request.search.as_deref(), Some("rust async"));
        assert!(job.request.url.is_none());
    }

    #[test]
    fn laters_without_query_sends_none() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(None);
        assert!(dispatch::process_input(&registry, &mut session, "laters"));
        let job = jobs.try_recv().unwrap();
        assert!(job.request.search.is_none());
    }

    #[test]
    fn note_sends_joined_text() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(Some("deadbeef"));

        assert!(dispatch::process_input(
            &registry,
            &mut session,
            "n remember to read this"
        ));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.kind, RenderKind::NoteAdded);
        assert_eq!(job.request.action, Action::AddNote);
        assert_eq!(job.request.note.as_deref(), Some("remember to read this"));
    }

    #[test]
    fn notes_sends_optional_search() {
        let registry = builtin_registry();

        let (mut session, jobs) = session_with_jobs(None);
        assert!(dispatch::process_input(&registry, &mut session, "notes"));
        assert!(jobs.try_recv().unwrap().request.search.is_none());

        let (mut session, jobs) = session_with_jobs(None);
        assert!(dispatch::process_input(&registry, &mut session, "notes rust"));
        assert_eq!(
            jobs.try_recv().unwrap().request.search.as_deref(),
            Some("rust")
        );
    }

    #[test]
    fn note_add_and_notes_list_never_both_fire() {
        // `n xyz` adds a note; `ns xyz` lists notes. The two shapes must
        // not overlap.
        let registry = builtin_registry();
        assert_eq!(matching(&registry, "n xyz").len(), 1);
        assert_eq!(
            matching(&registry, "n xyz"),
            vec!["note <note> | n <note>".to_string()]
        );
        assert_eq!(
            matching(&registry, "ns xyz"),
            vec!["notes [<query>] | ns [<query>]".to_string()]
        );
    }

    #[test]
    fn flag_sends_flag_note() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(Some("deadbeef"));

        assert!(dispatch::process_input(&registry, &mut session, "flag a rude note"));

        let job = jobs.try_recv().unwrap();
        assert_eq!(job.kind, RenderKind::NoteFlagged);
        assert_eq!(job.request.action, Action::FlagNote);
        assert_eq!(job.request.note.as_deref(), Some("a rude note"));
    }

    #[test]
    fn anonymous_session_omits_identity() {
        let registry = builtin_registry();
        let (mut session, jobs) = session_with_jobs(None);
        assert!(dispatch::process_input(&registry, &mut session, "tags"));
        assert!(jobs.try_recv().unwrap().request.installation_id.is_none());
    }

    #[test]
    fn dead_worker_degrades_to_error_line() {
        let registry = builtin_registry();
        let (handle, jobs) = RemoteHandle::detached();
        drop(jobs);
        let mut session = Session::new("https://example.org/article", None, handle);

        // The command still matches and "runs" — dispatch reports true.
        assert!(dispatch::process_input(&registry, &mut session, "tags"));
        let error_lines: Vec<_> = session
            .output
            .lines()
            .iter()
            .filter(|l| l.text.starts_with("Error: "))
            .collect();
        assert_eq!(error_lines.len(), 1);
        assert_eq!(error_lines[0].color, Some(session.palette.error));
    }

    // --- Help ---

    #[test]
    fn help_lists_sorted_padded_usages() {
        let registry = builtin_registry();
        let (mut session, _jobs) = session_with_jobs(None);

        assert!(dispatch::process_input(&registry, &mut session, "help"));

        let lines = session.output.lines();
        // Echo, then one line per builtin, then the spacer.
        assert_eq!(lines.len(), 1 + registry.len() + 1);

        let body: Vec<&str> = lines[1..lines.len() - 1]
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        let mut sorted = body.clone();
        sorted.sort();
        assert_eq!(body, sorted, "help output is sorted");

        // Every line pads its usage column to the widest usage.
        let width = registry
            .entries()
            .iter()
            .map(|r| r.usage.chars().count())
            .max()
            .unwrap();
        for line in &body {
            assert!(line.chars().count() > width + 2);
        }
        assert!(body.iter().any(|l| l.starts_with("help")));
        assert!(body.iter().any(|l| l.contains("show tags for this url")));
    }

    // --- Outcome rendering ---

    fn rendered(kind: RenderKind, result: Result<ApiResponse, String>) -> Vec<OutputLineText> {
        let mut output = OutputLog::new();
        let palette = Palette::default();
        render_outcome(
            &mut output,
            &palette,
            CallOutcome { kind, result },
        );
        output
            .lines()
            .iter()
            .map(|l| OutputLineText {
                text: l.text.clone(),
                color: l.color,
            })
            .collect()
    }

    #[derive(Debug)]
    struct OutputLineText {
        text: String,
        color: Option<crate::console::output::Color>,
    }

    fn tag_record(tag: &str) -> Record {
        Record {
            tag: Some(tag.to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn render_tags_success() {
        let lines = rendered(
            RenderKind::TagsListed,
            Ok(ApiResponse::success(vec![tag_record("rust"), tag_record("tui")])),
        );
        assert_eq!(lines[0].text, "rust tui");
        assert_eq!(lines[0].color, None);
    }

    #[test]
    fn render_tags_empty() {
        for kind in [RenderKind::TagsListed, RenderKind::TagsAdded] {
            let lines = rendered(kind, Ok(ApiResponse::success(vec![])));
            assert_eq!(lines[0].text, "Sorry, this URL does not have any tags.");
        }
    }

    #[test]
    fn render_failed_result_is_error_line() {
        let lines = rendered(
            RenderKind::TagsListed,
            Ok(ApiResponse {
                result: "rate_limited".to_string(),
                data: vec![],
            }),
        );
        assert_eq!(lines[0].text, "Error: rate_limited");
        assert_eq!(lines[0].color, Some(Palette::default().error));
    }

    #[test]
    fn render_transport_error_is_error_line() {
        let lines = rendered(RenderKind::NotesListed, Err("HTTP 503".to_string()));
        assert_eq!(lines[0].text, "Error: HTTP 503");
        assert_eq!(lines[0].color, Some(Palette::default().error));
        assert_eq!(lines.len(), 2, "error line plus spacer only");
    }

    #[test]
    fn render_link_added() {
        let data = vec![
            Record {
                link: Some("https://a.example/".to_string()),
                ..Record::default()
            },
            Record {
                link: Some("https://b.example/".to_string()),
                ..Record::default()
            },
        ];
        let lines = rendered(RenderKind::LinkAdded, Ok(ApiResponse::success(data)));
        assert_eq!(lines[0].text, "Links: https://a.example/ https://b.example/");
    }

    #[test]
    fn render_links_listed() {
        let data = vec![
            Record {
                url: Some("https://a.example/".to_string()),
                ..Record::default()
            },
            Record {
                url: Some("https://b.example/".to_string()),
                ..Record::default()
            },
        ];
        let lines = rendered(RenderKind::LinksListed, Ok(ApiResponse::success(data)));
        assert_eq!(lines[0].text, "https://a.example/");
        assert_eq!(lines[1].text, "https://b.example/");
        assert_eq!(lines[2].text, "");
    }

    #[test]
    fn render_later_saved_counts_items() {
        let data = vec![Record::default(), Record::default(), Record::default()];
        let lines = rendered(RenderKind::LaterSaved, Ok(ApiResponse::success(data)));
        assert_eq!(lines[0].text, "Reading list now contains 3 items.");
    }

    #[test]
    fn render_laters_listed_with_tags() {
        let data = vec![Record {
            url: Some("https://a.example/".to_string()),
            tag_list: vec!["rust".to_string(), "read".to_string()],
            ..Record::default()
        }];
        let lines = rendered(RenderKind::LatersListed, Ok(ApiResponse::success(data)));
        assert_eq!(lines[0].text, "https://a.example/ [ rust read ]");
    }

    #[test]
    fn render_laters_empty() {
        let lines = rendered(RenderKind::LatersListed, Ok(ApiResponse::success(vec![])));
        assert_eq!(lines[0].text, "Sorry, this URL does not have any linked URLs.");
    }

    #[test]
    fn render_note_added() {
        let lines = rendered(RenderKind::NoteAdded, Ok(ApiResponse::success(vec![])));
        assert_eq!(lines[0].text, "Note has been added successfully.");
    }

    #[test]
    fn render_notes_listed() {
        let data = vec![Record {
            note: Some("check the appendix".to_string()),
            created_dt: Some("2014-03-01 10:00:00".to_string()),
            ..Record::default()
        }];
        let lines = rendered(RenderKind::NotesListed, Ok(ApiResponse::success(data)));
        assert_eq!(lines[0].text, "\"check the appendix\"  2014-03-01 10:00:00");
    }

    #[test]
    fn render_notes_empty() {
        let lines = rendered(RenderKind::NotesListed, Ok(ApiResponse::success(vec![])));
        assert_eq!(lines[0].text, "Sorry, this URL does not have any notes.");
    }

    #[test]
    fn render_note_flagged_uses_error_color() {
        let lines = rendered(RenderKind::NoteFlagged, Ok(ApiResponse::success(vec![])));
        assert_eq!(lines[0].text, "Thanks for flagging!");
        assert_eq!(lines[0].color, Some(Palette::default().error));
    }

    // --- Helpers ---

    #[test]
    fn words_after_command_splits_whitespace() {
        assert_eq!(words_after_command("tag  a   b"), vec!["a", "b"]);
        assert!(words_after_command("tags").is_empty());
    }

    #[test]
    fn text_after_command_single_spaces() {
        assert_eq!(text_after_command("note  hello   world"), "hello world");
        assert_eq!(text_after_command("notes"), "");
    }

    #[test]
    fn query_after_command_none_when_empty() {
        assert!(query_after_command("laters").is_none());
        assert_eq!(query_after_command("laters rust"), Some("rust".to_string()));
    }
}

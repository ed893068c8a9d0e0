use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use fandom_stats::formats::{ExceptionalDatabase, SectionedDatabase, UnifiedDatabase};
use predicates::prelude::*;

const BOOK_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Books | FanFiction</title></head>
<body>
<div id="list_output">
  <div><a href="/book/Percy-Jackson/" title="Percy Jackson">Percy Jackson</a> <span class="gray">(98.5K)</span></div>
  <div><a href="/book/Harry-Potter/" title="Harry Potter">Harry Potter</a> <span class="gray">(1,000)</span></div>
  <div><a href="/book/Ender-s-Game/" title="Ender\'s Game">Ender's Game</a> <span class="gray">(2,154)</span></div>
  <div><a href="/book/Long/" title="The \">The "Quoted" Sag...</a> <span class="gray">(7)</span></div>
</div>
</body>
</html>
"#;

const CROSSOVER_BOOK_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Books Crossover | FanFiction</title></head>
<body>
<div id="list_output">
  <div><a href="/crossovers/Harry-Potter-Naruto/1/" title="Harry Potter &amp; Naruto">Harry Potter &amp; Naruto</a> <span class="gray">(50)</span></div>
  <div><a href="/crossovers/Harry-Potter/224/" title="Harry Potter">Harry Potter</a> <span class="gray">(1.2M)</span></div>
</div>
</body>
</html>
"#;

const LONG_BROWSE_PAGE: &str = r#"<!doctype html>
<html><head><title>The "Quoted" Saga FanFiction Archive | FanFiction</title></head><body></body></html>
"#;

const BROKEN_PAGE: &str = r#"<!doctype html>
<html><head><title>Plays/Musicals | FanFiction</title></head><body><p>Maintenance</p></body></html>
"#;

fn spawn_archive_server() -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}", server.server_addr());

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let (status, body) = match request.url() {
                "/book/" => (200, BOOK_PAGE),
                "/crossovers/book/" => (200, CROSSOVER_BOOK_PAGE),
                "/book/Long/" => (200, LONG_BROWSE_PAGE),
                "/play/" => (200, BROKEN_PAGE),
                _ => (404, "not found"),
            };

            let mut response = tiny_http::Response::from_string(body).with_status_code(status);
            if status == 200 {
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/html; charset=utf-8"[..],
                )
                .expect("build header");
                response = response.with_header(header);
            }
            let _ = request.respond(response);
        }
    });

    (base_url, shutdown_tx, handle)
}

fn fandom_stats(base_url: &str, out: &std::path::Path, sections: &[&str]) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fandom-stats");
    cmd.args(["--origin", base_url])
        .arg("--out")
        .arg(out)
        .args(["--delay-ms", "0", "--lookup-delay-ms", "0", "--timeout-secs", "5"]);
    for &section in sections {
        cmd.args(["--section", section]);
    }
    cmd
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[test]
fn scrape_writes_all_three_views() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_archive_server();
    let temp = tempfile::TempDir::new()?;
    let out = temp.path().join("nested").join("json");

    fandom_stats(&base_url, &out, &["/book/", "/crossovers/book/"])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("{base_url}/crossovers/book/")));

    let sectioned: SectionedDatabase = read_json(&out.join("fandom.json"))?;
    let book = &sectioned.not_crossover["book"];
    assert_eq!(book.name, "Books");
    let names: Vec<&str> = book.fandoms.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Ender's Game", "Harry Potter", "Percy Jackson", "The \"Quoted\" Saga"]
    );
    assert_eq!(book.fandoms[2].rough_story_number, 98_500);
    assert_eq!(book.fandoms[2].url, format!("{base_url}/book/Percy-Jackson/"));
    assert_eq!(sectioned.crossover["book"].name, "Books");

    let unified: UnifiedDatabase = read_json(&out.join("unified-fandom.json"))?;
    assert_eq!(unified.date, sectioned.date);
    assert_eq!(unified.sections.len(), 1);
    assert_eq!(
        unified.sections["book"].crossover_url.as_deref(),
        Some(format!("{base_url}/crossovers/book/").as_str())
    );
    let harry = &unified.fandoms["Harry Potter"];
    assert_eq!(harry.len(), 2);
    assert!(!harry[0].crossover);
    assert!(harry[1].crossover);
    assert_eq!(harry[1].rough_story_number, 1_200_000);
    assert!(unified.fandoms.contains_key("Harry Potter & Naruto"));

    let exceptional: ExceptionalDatabase = read_json(&out.join("exceptional-fandom.json"))?;
    assert_eq!(exceptional.date, sectioned.date);
    assert_eq!(exceptional.fandoms, vec!["Harry Potter & Naruto"]);

    let raw = std::fs::read_to_string(out.join("exceptional-fandom.json"))?;
    assert!(raw.starts_with("{\n    \"date\": "));

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn missing_section_page_aborts_without_output() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_archive_server();
    let temp = tempfile::TempDir::new()?;
    let out = temp.path().join("json");

    fandom_stats(&base_url, &out, &["/book/", "/anime/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("{base_url}/anime/")))
        .stderr(predicate::str::contains("404"));

    assert!(!out.exists());

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn broken_section_is_written_with_empty_list() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_archive_server();
    let temp = tempfile::TempDir::new()?;
    let out = temp.path().join("json");

    fandom_stats(&base_url, &out, &["/play/", "/book/"])
        .assert()
        .success()
        .stderr(predicate::str::contains("keeping partial list"));

    let sectioned: SectionedDatabase = read_json(&out.join("fandom.json"))?;
    assert_eq!(sectioned.not_crossover["play"].name, "Plays/Musicals");
    assert!(sectioned.not_crossover["play"].fandoms.is_empty());
    assert_eq!(sectioned.not_crossover["book"].fandoms.len(), 4);

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

#[test]
fn rust_log_debug_emits_parsed_cli() -> anyhow::Result<()> {
    let (base_url, shutdown_tx, server_handle) = spawn_archive_server();
    let temp = tempfile::TempDir::new()?;
    let out = temp.path().join("json");

    fandom_stats(&base_url, &out, &["/crossovers/book/"])
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));

    let _ = shutdown_tx.send(());
    let _ = server_handle.join();
    Ok(())
}

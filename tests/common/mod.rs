//! Fixture databases and documents shared by the integration tests.

#![allow(dead_code)]

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

async fn writable(path: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap()
}

async fn create_commentary(path: &Path) {
    let pool = writable(path).await;
    sqlx::query(
        "CREATE TABLE commentary (id INTEGER PRIMARY KEY, file_name TEXT, txt TEXT, father_name TEXT, source_title TEXT, source_url TEXT)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let rows = [
        (1, "aug_john_12.txt", "John 3:16", "Augustine", "Tractates on the Gospel of John"),
        (
            2,
            "chrys_john_27.txt",
            "Chrysostom on John 3:16: the love of God is shown in the giving of the Son.",
            "John Chrysostom",
            "Homilies on the Gospel of John",
        ),
        (3, "aug_grace.txt", "On grace and free will", "Augustine", "On Grace and Free Will"),
    ];
    for (id, file, txt, father, title) in rows {
        sqlx::query("INSERT INTO commentary VALUES (?, ?, ?, ?, ?, NULL)")
            .bind(id)
            .bind(file)
            .bind(txt)
            .bind(father)
            .bind(title)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;
}

async fn create_bible(path: &Path, john_3_16: &str) {
    let pool = writable(path).await;
    sqlx::query("CREATE TABLE bible (Book INTEGER, Chapter INTEGER, Versecount INTEGER, Verse TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    let rows = [
        (42, 3, 15, "that whoever believes in him may have eternal life."),
        (42, 3, 16, john_3_16),
        (42, 3, 17, "For God did not send his Son into the world to condemn the world."),
        (44, 8, 28, "And we know that for those who love God all things work together for good."),
    ];
    for (book, chapter, verse, text) in rows {
        sqlx::query("INSERT INTO bible VALUES (?, ?, ?, ?)")
            .bind(book)
            .bind(chapter)
            .bind(verse)
            .bind(text)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;
}

fn page(breadcrumbs: &[&str], title: &str, body: &str) -> String {
    let links: Vec<String> = breadcrumbs
        .iter()
        .map(|b| format!("<a href=\"#\">{}</a>", b))
        .collect();
    format!(
        "<html><body><div class=\"breadcrumbs\">{}</div><h1>{}</h1><p>{}</p></body></html>",
        links.join(" &gt; "),
        title,
        body
    )
}

/// Documents as `(file_path, indexed content, html)`.
fn documents() -> Vec<(&'static str, String, String)> {
    let grace = format!(
        "On grace. {} The same grace is given freely.",
        "Of the nature of the will and its bondage. ".repeat(40)
    );
    let depravity = "A treatise on total depravity and the will.".to_string();
    let john = "Homily on John 3:16 and the love of God.".to_string();
    vec![
        (
            "fathers/grace.htm",
            grace.clone(),
            page(&["Home", "Fathers", "Augustine"], "On Grace", &grace),
        ),
        (
            "fathers/depravity.htm",
            depravity.clone(),
            format!("<html><body><p>{}</p></body></html>", depravity),
        ),
        (
            "fathers/john.htm",
            john.clone(),
            page(&["Home", "Fathers", "Chrysostom"], "Homily XXVII", &john),
        ),
    ]
}

async fn create_index(path: &Path, docs: &[(&str, String, String)]) {
    let pool = writable(path).await;
    sqlx::query("CREATE VIRTUAL TABLE documents_fts USING fts5(file_path UNINDEXED, content)")
        .execute(&pool)
        .await
        .unwrap();
    for (file_path, content, _) in docs {
        sqlx::query("INSERT INTO documents_fts (file_path, content) VALUES (?, ?)")
            .bind(file_path.replace('/', "\\"))
            .bind(content)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;
}

/// Build databases, documents and a config file under a fresh temp dir.
///
/// Returns the temp dir (keep it alive) and the config path.
pub async fn setup_test_env(bind: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    let bible_dir = data_dir.join("bible_translations");
    fs::create_dir_all(&bible_dir).unwrap();

    create_commentary(&data_dir.join("commentaries.sqlite")).await;
    create_bible(&bible_dir.join("ESV.db"), "For God so loved the world, that he gave his only Son.").await;
    create_bible(
        &bible_dir.join("KJV.db"),
        "For God so loved the world, that he gave his only begotten Son.",
    )
    .await;

    let docs = documents();
    create_index(&data_dir.join("index.sqlite"), &docs).await;
    for (file_path, _, html) in &docs {
        let path = root.join("static").join(file_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, html).unwrap();
    }

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_content = format!(
        r#"[commentary]
path = "{root}/data/commentaries.sqlite"

[bible]
dir = "{root}/data/bible_translations"
default_translation = "ESV"

[index]
path = "{root}/data/index.sqlite"

[documents]
root = "{root}/static"

[retrieval]
result_limit = 20
context_radius = 40

[server]
bind = "{bind}"
"#,
        root = root.display(),
        bind = bind
    );
    let config_path = config_dir.join("lectio.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};

use serde::Deserialize;
use tries_freq_core::io::{list_files, normalize_folder};
use tries_freq_core::{create_from_file, merge, split_words, TrieNode, TrieResult};

const DEFAULT_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_DATA: &str = "./data";

/// Query parameters shared by the endpoints taking a word.
///
/// `pattern` is the separator regex used to split the word into tokens
/// (empty = one token per character).
#[derive(Deserialize)]
struct WordQuery {
	word: Option<String>,
	prefix: Option<String>,
	pattern: Option<String>,
}

#[derive(Deserialize)]
struct PathsQuery {
	prefix: Option<String>,
	pattern: Option<String>,
	probabilities: Option<bool>,
	shrink: Option<bool>,
	delimiter: Option<String>,
}

#[derive(Deserialize)]
struct DictionaryQuery {
	names: Option<String>,
	pattern: Option<String>,
}

struct SharedData {
	data_folder: PathBuf,
	trie: Option<TrieNode>,
	/// `trie` converted with `node_probabilities`, kept for `/v1/generate`.
	probabilities: Option<TrieNode>,
	names: Vec<String>,
}

/// Splits `input` into tokens with `pattern` (empty pattern by default).
fn tokens(input: &str, pattern: &Option<String>) -> Result<Vec<String>, String> {
	let pattern = pattern.as_deref().unwrap_or("");
	split_words(&[input], pattern)
		.map(|mut words| words.pop().unwrap_or_default())
		.map_err(|e| e.to_string())
}

/// `true` if `name` names a file directly inside the data folder.
fn is_dictionary_name(name: &str) -> bool {
	!name.contains(['/', '\\'])
		&& !name.contains("..")
		&& Path::new(name).file_name() == Some(OsStr::new(name))
}

/// Builds one trie per word list and merges them, along with its probability trie.
fn load_dictionaries(
	data_folder: &Path,
	names: &[String],
	pattern: &str,
) -> TrieResult<(Option<TrieNode>, Option<TrieNode>)> {
	let mut trie = None;
	for name in names {
		let path = data_folder.join(format!("{name}.txt"));
		let partial_trie = create_from_file(&path, pattern)
			.inspect_err(|e| warn!("Failed to load {}: {e}", path.display()))?;
		trie = merge(trie, partial_trie);
	}

	let probabilities = trie.as_ref().map(TrieNode::node_probabilities);
	Ok((trie, probabilities))
}

macro_rules! lock_or_500 {
	($data:expr) => {
		match $data.lock() {
			Ok(m) => m,
			Err(_) => return HttpResponse::InternalServerError().body("Trie lock failed"),
		}
	};
}

macro_rules! trie_or_404 {
	($shared:expr) => {
		match &$shared.trie {
			Some(trie) => trie,
			None => return HttpResponse::NotFound().body("No dictionary loaded"),
		}
	};
}

/// HTTP GET endpoint `/v1/contains`
///
/// Answers `true` if the whole word is in the trie and is a complete match.
#[get("/v1/contains")]
async fn get_contains(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let word = match &query.word {
		Some(w) if !w.is_empty() => w,
		_ => return HttpResponse::BadRequest().body("Missing or empty word"),
	};
	let sequence = match tokens(word, &query.pattern) {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared_data = lock_or_500!(data);
	let trie = trie_or_404!(shared_data);
	HttpResponse::Ok().body(trie.contains(&sequence).to_string())
}

/// HTTP GET endpoint `/v1/words`
///
/// Lists, as a JSON array of token arrays, the words starting with `prefix`.
#[get("/v1/words")]
async fn get_words(data: web::Data<Mutex<SharedData>>, query: web::Query<WordQuery>) -> impl Responder {
	let prefix = match &query.prefix {
		Some(p) if !p.is_empty() => p,
		_ => return HttpResponse::BadRequest().body("Missing or empty prefix"),
	};
	let sequence = match tokens(prefix, &query.pattern) {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared_data = lock_or_500!(data);
	let trie = trie_or_404!(shared_data);
	match trie.get_words(&sequence) {
		Some(words) => HttpResponse::Ok().json(words),
		None => HttpResponse::NotFound().body("Prefix not found"),
	}
}

/// HTTP GET endpoint `/v1/paths`
///
/// Returns the root-to-leaf paths of the sub-trie below `prefix` (the whole
/// trie without prefix), optionally converted to probabilities and shrunk.
#[get("/v1/paths")]
async fn get_paths(data: web::Data<Mutex<SharedData>>, query: web::Query<PathsQuery>) -> impl Responder {
	let sequence = match query.prefix.as_deref() {
		Some(p) if !p.is_empty() => match tokens(p, &query.pattern) {
			Ok(s) => s,
			Err(e) => return HttpResponse::BadRequest().body(e),
		},
		_ => Vec::new(),
	};

	let shared_data = lock_or_500!(data);
	let trie = trie_or_404!(shared_data);

	let mut sub_trie = trie.retrieve(&sequence).clone();
	if query.probabilities.unwrap_or(false) {
		sub_trie = sub_trie.node_probabilities();
	}
	if query.shrink.unwrap_or(false) {
		sub_trie = sub_trie.shrink(query.delimiter.as_deref().unwrap_or(""));
	}

	match sub_trie.paths_json() {
		Ok(json) => HttpResponse::Ok().content_type("application/json").body(json),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Draws a random word from the probability trie.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	match &shared_data.probabilities {
		Some(probabilities) => HttpResponse::Ok().json(probabilities.random_word_with_default_rng()),
		None => HttpResponse::NotFound().body("No dictionary loaded"),
	}
}

#[get("/v1/dictionaries")]
async fn get_dictionaries(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	match list_files(&shared_data.data_folder, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list dictionaries"),
	}
}

#[get("/v1/loaded_dictionaries")]
async fn get_loaded_dictionaries(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	HttpResponse::Ok().body(shared_data.names.join("\n"))
}

/// HTTP PUT endpoint `/v1/load_dictionaries`
///
/// Replaces the shared trie with the merge of the comma-separated word lists
/// in `names`, each read from `<data folder>/<name>.txt`.
///
/// # Notes
/// - Names holding a path separator or `..` are rejected with 400.
/// - The tries are built on the blocking pool, without holding the lock.
///   A failure keeps the current trie and names.
#[put("/v1/load_dictionaries")]
async fn put_dictionaries(data: web::Data<Mutex<SharedData>>, query: web::Query<DictionaryQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty dictionary name"),
	};
	let pattern = query.pattern.clone().unwrap_or_default();

	let names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();
	if let Some(name) = names.iter().find(|name| !is_dictionary_name(name)) {
		warn!("Rejected dictionary name {name:?}");
		return HttpResponse::BadRequest().body(format!("Invalid dictionary name: {name}"));
	}

	let data_folder = {
		let shared_data = lock_or_500!(data);
		shared_data.data_folder.clone()
	};

	let to_load = names.clone();
	let loaded = web::block(move || load_dictionaries(&data_folder, &to_load, &pattern)).await;
	let (trie, probabilities) = match loaded {
		Ok(Ok(tries)) => tries,
		Ok(Err(e)) => return HttpResponse::InternalServerError().body(format!("Failed to load dictionary: {e}")),
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load dictionary: {e}")),
	};

	info!("Loaded dictionaries: {}", names.join(", "));
	let mut shared_data = lock_or_500!(data);
	shared_data.trie = trie;
	shared_data.probabilities = probabilities;
	shared_data.names = names;

	HttpResponse::Ok().body("Dictionaries loaded successfully")
}

/// Main entry point for the server.
///
/// Starts an Actix-web HTTP server over one shared trie, wrapped in a `Mutex`.
///
/// # Notes
/// - `TRIES_FREQ_ADDR` sets the bind address (default `127.0.0.1:5000`).
/// - `TRIES_FREQ_DATA` sets the folder holding the `.txt` word lists (default `./data`).
/// - `RUST_LOG` controls logging.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let addr = env::var("TRIES_FREQ_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
	let data_folder = normalize_folder(&env::var("TRIES_FREQ_DATA").unwrap_or_else(|_| DEFAULT_DATA.to_owned()));
	info!("Serving tries from {} on {}", data_folder.display(), addr);

	let shared_data = SharedData {
		data_folder,
		trie: None,
		probabilities: None,
		names: Vec::new(),
	};
	let shared_trie = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.app_data(shared_trie.clone())
			.service(get_contains)
			.service(get_words)
			.service(get_paths)
			.service(get_generated)
			.service(get_dictionaries)
			.service(get_loaded_dictionaries)
			.service(put_dictionaries)
	})
		.bind(addr)?
		.run()
		.await
}

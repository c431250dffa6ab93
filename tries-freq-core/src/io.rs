use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Skips blank lines (they would produce empty sequences)
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_file_skips_blank_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("words.txt");
		fs::write(&path, "arm\r\n\narc\n  \n").unwrap();
		assert_eq!(read_file(&path).unwrap(), vec!["arm", "arc"]);
	}

	#[test]
	fn test_list_files_filters_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "x").unwrap();
		fs::write(dir.path().join("a.txt"), "x").unwrap();
		fs::write(dir.path().join("c.bin"), "x").unwrap();
		fs::create_dir(dir.path().join("d.txt")).unwrap();

		assert_eq!(list_files(dir.path(), "txt").unwrap(), vec!["a.txt", "b.txt"]);
	}

	#[test]
	fn test_normalize_folder() {
		assert_eq!(normalize_folder("data"), PathBuf::from("data"));
		assert!(normalize_folder(".").is_absolute() || normalize_folder(".") == PathBuf::from("."));
	}
}

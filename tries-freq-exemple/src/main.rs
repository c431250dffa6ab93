use tries_freq_core::{create_by_splitting, paths_to_json, TrieNode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Every word is split into characters (the empty pattern)
    let words = ["arm", "arms", "arc", "bar", "bark", "barman", "arcola"];
    let trie: TrieNode = create_by_splitting(&words, "")?.ok_or("No words to build a trie from")?;

    println!("trie = ");
    println!("{}\n", trie.to_json_pretty()?);

    // Sub-trie below "a" -> "r" -> "m"
    let arm = ["a", "r", "m"];
    let sub_trie = trie.retrieve(&arm);
    println!("retrieve(arm) = ");
    println!("{}\n", sub_trie.to_json_pretty()?);

    // Containment and completion of a few words
    for word in ["arm", "ar", "barman", "barn"] {
        let tokens: Vec<String> = word.chars().map(String::from).collect();
        println!(
            "{word}: position = {:?}, complete match = {}, contains = {}",
            trie.position(&tokens),
            trie.complete_match(&tokens),
            trie.contains(&tokens)
        );
    }
    println!();

    // All the words starting with "bar"
    if let Some(words) = trie.get_words(&["b", "a", "r"]) {
        let words: Vec<String> = words.iter().map(|word| word.concat()).collect();
        println!("words(bar) = {:?}\n", words);
    }

    // Counts become conditional probabilities (the root is 1)
    let probabilities = trie.node_probabilities();
    println!("probabilities = ");
    println!("{}\n", probabilities.to_json_pretty()?);

    // Single-child chains are collapsed
    let shrunk = probabilities.shrink("");
    println!("shrunk paths = ");
    println!("{}\n", paths_to_json(&shrunk.root_to_leaf_paths())?);

    // Random words drawn from the probability trie
    for i in 0..5 {
        println!("Random word {}: {}", i + 1, probabilities.random_word_with_default_rng().concat());
    }

    // The paths can also be turned back into a JSON value
    let paths: serde_json::Value = serde_json::from_str(&trie.paths_json()?)?;
    println!("\nleaves = {}", paths.as_array().map_or(0, Vec::len));

    Ok(())
}

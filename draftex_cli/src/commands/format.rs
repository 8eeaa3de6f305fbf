use std::path::Path;

use anyhow::Result;

use super::load::load;

/// `draftex format <file>`: tokenize, expand, serialize, print the result.
pub fn run(file: &Path) -> Result<()> {
    let root = load(file)?;
    let out = draftex_serialize::serialize(&root);
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_prints_the_round_tripped_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hello world").unwrap();
        assert!(run(file.path()).is_ok());
    }

    #[test]
    fn format_reports_ill_formed_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{unclosed").unwrap();
        assert!(run(file.path()).is_err());
    }
}

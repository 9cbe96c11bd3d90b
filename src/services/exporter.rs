use std::path::Path;

use crate::errors::Error;
use crate::utils::random_hex;

fn slugify(query: &str) -> String {
    let slug = query
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    slug.chars().take(60).collect()
}

/// Persists final markdown to a uniquely named file under the export
/// directory and returns its resolved path. The random suffix keeps repeated
/// runs of the same query from colliding.
pub async fn export_to_local_doc(
    export_dir: &str,
    query: &str,
    article_markdown: &str,
) -> Result<String, Error> {
    tokio::fs::create_dir_all(export_dir).await?;

    let filename = format!("{}-{}.md", slugify(query), random_hex(3));
    let path = Path::new(export_dir).join(filename);
    tokio::fs::write(&path, article_markdown).await?;

    let resolved = tokio::fs::canonicalize(&path).await?;
    Ok(resolved.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_lowercased_joined_and_capped() {
        assert_eq!(slugify("Best Espresso Machines"), "best-espresso-machines");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert!(slugify(&"word ".repeat(40)).chars().count() <= 60);
    }

    #[tokio::test]
    async fn export_writes_a_readable_file() {
        let dir = std::env::temp_dir().join(format!("seoforge-export-{}", random_hex(4)));
        let dir = dir.to_string_lossy().into_owned();

        let path = export_to_local_doc(&dir, "best espresso machines", "# Article")
            .await
            .unwrap();
        assert!(path.contains("best-espresso-machines-"));
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, "# Article");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn repeated_exports_do_not_collide() {
        let dir = std::env::temp_dir().join(format!("seoforge-export-{}", random_hex(4)));
        let dir = dir.to_string_lossy().into_owned();

        let first = export_to_local_doc(&dir, "same query", "one").await.unwrap();
        let second = export_to_local_doc(&dir, "same query", "two").await.unwrap();
        assert_ne!(first, second);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

//! Final deletion confirmation and execution.

use crate::utils::fs as fsutil;
use crate::utils::ui::{self, Palette};
use crate::Result;
use std::path::{Path, PathBuf};

/// Show the accumulated deletion list with sizes, ask for an explicit
/// confirmation, then remove each directory tree. A failure on one item
/// never aborts the rest.
pub fn confirm_and_delete(to_delete: &[PathBuf], palette: Palette) -> Result<()> {
    if to_delete.is_empty() {
        println!("\nNo directories selected for deletion.");
        return Ok(());
    }

    println!("\n=== DIRECTORIES TO DELETE ({} items) ===", to_delete.len());
    let mut total_bytes = 0u64;
    for path in to_delete {
        let size_bytes = fsutil::directory_size(path);
        total_bytes += size_bytes;
        println!(
            "{:40} {:10.2} MB",
            basename(path),
            fsutil::bytes_to_mb(size_bytes)
        );
    }
    println!(
        "\n{}",
        palette.green(&format!(
            "Total space to free: {:.2} MB",
            fsutil::bytes_to_mb(total_bytes)
        ))
    );

    if !ui::confirm("\nConfirm deletion? (y/n): ", None)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    println!("\nDeleting directories...");
    for path in to_delete {
        match std::fs::remove_dir_all(path) {
            Ok(()) => println!("Deleted: {}", basename(path)),
            Err(e) => println!("Error deleting {}: {}", basename(path), e),
        }
    }
    println!(
        "\nDeletion complete. {} directories processed.",
        to_delete.len()
    );
    Ok(())
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

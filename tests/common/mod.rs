#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use table_continuity::model::{Table, table_from};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Scratch directory that is removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Two policy rows from the first page of an insurance statement.
pub fn fire_policies() -> Table {
    table_from([
        vec![
            "11", "Fire", "0307051124P101014688/0", "TOP IN TOWN", "15/04/2025", "16,965.00",
            "11,196.00", "3,393.00", "Corporate",
        ],
        vec![
            "11", "Fire", "0307051124P101014697/0", "TOP IN TOWN", "15/04/2025", "10,500.00",
            "00.00", "525.00", "Corporate",
        ],
    ])
}

/// Three policy rows from the following page of the same statement.
pub fn property_policies() -> Table {
    table_from([
        vec![
            "12", "Property Insurance", "0307051224P100918995/0", "LAXMI SWAYAMVAR GROUP",
            "11/04/2025", "399.00", "72.00", "59.85", "Corporate",
        ],
        vec![
            "12", "Property Insurance", "0307051224P100919201/0", "LAXMI SWAYAMVAR GROUP",
            "11/04/2025", "1,000.00", "180.00", "150.00", "Corporate",
        ],
        vec![
            "12", "Property Insurance", "0307051224P100920363/0", "LAXMI SWAYAMVAR GROUP",
            "11/04/2025", "18,198.00", "3,276.00", "2,729.70", "Corporate",
        ],
    ])
}

pub fn patients() -> Table {
    table_from([
        vec!["Patient Name", "Age", "DOB", "Contact", "ID"],
        vec!["John Doe", "30", "1993-05-15", "john@example.com", "ID123/123"],
        vec!["Jane Smith", "25", "1998-09-22", "jane@example.com", "ID123/124"],
        vec!["Bob Johnson", "40", "1983-12-01", "bob@example.com", "ID123/125"],
    ])
}

/// Continuation page that repeats its own header row.
pub fn more_patients() -> Table {
    table_from([
        vec!["Full Name", "Years", "DOB", "Contact", "ID"],
        vec!["Alice Brown", "28", "1995-07-10", "alice@example.com", "ID123/126"],
        vec!["Charlie Davis", "35", "1988-03-18", "charlie@example.com", "ID123/127"],
        vec!["Eva Wilson", "22", "2001-11-30", "eva@example.com", "ID123/128"],
    ])
}

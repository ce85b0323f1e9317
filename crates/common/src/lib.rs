use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Output sink used by `decode_into`-style APIs.
pub trait OutputBuffer {
    /// Writes the full payload to the sink, replacing any previous content.
    fn write_exact(&mut self, data: &[u8]) -> io::Result<()>;
}

impl OutputBuffer for Vec<u8> {
    fn write_exact(&mut self, data: &[u8]) -> io::Result<()> {
        self.clear();
        self.extend_from_slice(data);
        Ok(())
    }
}

impl OutputBuffer for fs::File {
    fn write_exact(&mut self, data: &[u8]) -> io::Result<()> {
        use std::io::{Seek, SeekFrom, Write};

        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        self.write_all(data)
    }
}

/// Appends every regular file below `root` to `out`.
///
/// Unreadable directories are skipped silently. Symlinked directories are not
/// followed.
pub fn collect_files_recursive(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            collect_files_recursive(&path, out);
        } else if file_type.is_file() {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn vec_sink_replaces_previous_content() {
        let mut sink = vec![9u8; 16];
        sink.write_exact(&[1, 2, 3]).expect("vec write");
        assert_eq!(sink, [1, 2, 3]);
    }

    #[test]
    fn collects_nested_files_only() {
        let tmp = TempDir::new("common").expect("tempdir");
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(tmp.path().join("top.bin"), b"x").expect("write top");
        fs::write(nested.join("deep.bin"), b"y").expect("write deep");

        let mut files = Vec::new();
        collect_files_recursive(tmp.path(), &mut files);
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("a/b/deep.bin")));
        assert!(files.iter().any(|p| p.ends_with("top.bin")));
    }

    #[test]
    fn missing_root_yields_nothing() {
        let mut files = Vec::new();
        collect_files_recursive(Path::new("/definitely/not/here"), &mut files);
        assert!(files.is_empty());
    }
}

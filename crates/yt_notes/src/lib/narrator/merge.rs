use std::path::{Path, PathBuf};

use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    error::MergeError,
    narrator::{AudioMerger, SegmentFile},
};

/// Concatenates MP3 segments frame-wise without re-encoding.
///
/// MPEG audio frames are self-delimiting, so appending the frame data of
/// each segment yields a playable stream once per-file ID3 tags are removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameConcat;

impl AudioMerger for FrameConcat {
    #[tracing::instrument(skip(self, segments), fields(segments = segments.len()))]
    async fn merge(&self, segments: Vec<SegmentFile>, output: &Path) -> Result<(), MergeError> {
        if segments.is_empty() {
            return Err(MergeError::Empty);
        }

        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        tokio::fs::create_dir_all(dir).await?;

        // written next to the destination so the final rename stays on one filesystem
        let (file, temp_path) = tempfile::NamedTempFile::new_in(dir)?.into_parts();
        let mut merged = tokio::fs::File::from_std(file);
        for segment in segments {
            let bytes = tokio::fs::read(segment.path()).await?;
            merged.write_all(strip_id3(&bytes)).await?;
            tracing::trace!(index = segment.index(), "Merged audio segment");
        }
        merged.flush().await?;
        drop(merged);
        temp_path.persist(output)?;

        Ok(())
    }
}

/// Returns the MPEG frame data of `bytes` without a leading ID3v2 tag or a
/// trailing ID3v1 tag.
pub fn strip_id3(bytes: &[u8]) -> &[u8] {
    let mut data = bytes;

    if data.len() >= 10 && data.starts_with(b"ID3") {
        // synchsafe size: 4 bytes of 7 significant bits each
        let size = data[6..10]
            .iter()
            .fold(0usize, |acc, b| (acc << 7) | (*b as usize & 0x7f));
        let footer = if data[5] & 0x10 != 0 { 10 } else { 0 };
        data = data.get(10 + size + footer..).unwrap_or_default();
    }

    if data.len() >= 128 && data[data.len() - 128..].starts_with(b"TAG") {
        data = &data[..data.len() - 128];
    }

    data
}

/// Merges through the ffmpeg concat demuxer, re-encoding to a uniform MP3
/// stream.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

impl Ffmpeg {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl AudioMerger for Ffmpeg {
    #[tracing::instrument(skip(self, segments), fields(segments = segments.len()))]
    async fn merge(&self, segments: Vec<SegmentFile>, output: &Path) -> Result<(), MergeError> {
        let Some(first) = segments.first() else {
            return Err(MergeError::Empty);
        };

        let list_path = first.path().with_file_name("concat.txt");
        let list = segments
            .iter()
            // entries resolve relative to the list file, which sits beside the segments
            .map(|s| concat_entry(Path::new(s.path().file_name().unwrap_or_default())))
            .collect::<Vec<_>>()
            .join("\n");
        tokio::fs::write(&list_path, list).await?;

        let result = Command::new(&self.binary)
            .arg("-y")
            .arg("-loglevel")
            .arg("error")
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(&list_path)
            .arg("-c:a")
            .arg("libmp3lame")
            .arg("-q:a")
            .arg("4")
            .arg(output)
            .output()
            .await;

        // segments and list are only needed for the duration of the ffmpeg run
        drop(segments);
        if let Err(e) = tokio::fs::remove_file(&list_path).await {
            tracing::warn!(error = ?e, path = ?list_path, "Failed to clean up concat list");
        }

        let result = result?;
        if !result.status.success() {
            return Err(MergeError::Ffmpeg(
                String::from_utf8_lossy(&result.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}

/// Line of an ffmpeg concat list, quoting the path for the demuxer.
fn concat_entry(path: &Path) -> String {
    format!("file '{}'", path.display().to_string().replace('\'', r"'\''"))
}

use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;

/// Ordered image paths that make up the frames of a video, one image per
/// frame.
///
/// Ordering is by file name, so the same set of files always produces the
/// same sequence regardless of how the directory was listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl FrameSequence {
    /// Keeps the paths with a recognised image extension and sorts them by
    /// file name. `dir` is the folder the images were collected from.
    pub fn from_paths<I>(dir: impl Into<PathBuf>, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths.into_iter().filter(|p| is_image(p)).collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Self {
            dir: dir.into(),
            paths,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// Case-insensitive match against [`IMAGE_EXTENSIONS`].
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(seq: &FrameSequence) -> Vec<String> {
        seq.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[rstest]
    #[case("shot.png", true)]
    #[case("shot.PNG", true)]
    #[case("shot.jpg", true)]
    #[case("shot.JpEg", true)]
    #[case("shot.gif", false)]
    #[case("shot.png.txt", false)]
    #[case("png", false)]
    #[case("README", false)]
    fn test_is_image(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_image(Path::new(name)), expected);
    }

    #[test]
    fn test_sorted_by_file_name() {
        let seq = FrameSequence::from_paths("/d", vec![
            PathBuf::from("/d/c.png"),
            PathBuf::from("/d/a.png"),
            PathBuf::from("/d/b.jpg"),
        ]);
        assert_eq!(names(&seq), vec!["a.png", "b.jpg", "c.png"]);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let files = ["img10.png", "img02.png", "img1.png", "IMG3.png"];
        let forward = FrameSequence::from_paths("/d", files.iter().map(PathBuf::from));
        let backward = FrameSequence::from_paths("/d", files.iter().rev().map(PathBuf::from));
        assert_eq!(forward, backward);
        // Byte-wise: uppercase before lowercase, no natural-number ordering.
        assert_eq!(
            names(&forward),
            vec!["IMG3.png", "img02.png", "img1.png", "img10.png"]
        );
    }

    #[test]
    fn test_filters_unsupported_files() {
        let seq = FrameSequence::from_paths("/d", vec![
            PathBuf::from("notes.txt"),
            PathBuf::from("a.png"),
            PathBuf::from("clip.mp4"),
        ]);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.first(), Some(Path::new("a.png")));
    }

    #[test]
    fn test_empty() {
        let seq = FrameSequence::from_paths("/d/empty", Vec::new());
        assert!(seq.is_empty());
        assert_eq!(seq.dir(), Path::new("/d/empty"));
        assert!(seq.first().is_none());
    }
}

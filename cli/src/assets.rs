use anyhow::{Context, bail};
use pairflip_core::{ImageSet, SoundEvent, SoundSink};
use std::io::Write;
use std::path::Path;

const BACK_FILE: &str = "back.png";
/// Label drawn for every face-down card.
pub(crate) const BACK_LABEL: &str = "##";

/// Face labels from `<dir>/images/*.png`, sorted by file name, `back.png` excluded.
pub(crate) fn load_images(dir: &Path) -> anyhow::Result<ImageSet<String>> {
    let images_dir = dir.join("images");
    if !images_dir.is_dir() {
        bail!("Images folder not found: {}", images_dir.display());
    }

    let entries = std::fs::read_dir(&images_dir)
        .with_context(|| format!("Could not list {}", images_dir.display()))?;
    let mut faces = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Could not list {}", images_dir.display()))?
            .path();
        let is_png = path.extension().is_some_and(|ext| ext == "png");
        let is_back = path.file_name().is_some_and(|name| name == BACK_FILE);
        if !is_png || is_back {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            faces.push(stem.to_string_lossy().into_owned());
        }
    }
    faces.sort();
    log::debug!("Found {} face images in {}", faces.len(), images_dir.display());

    if !images_dir.join(BACK_FILE).is_file() {
        log::debug!("No {} found, using a plain back", BACK_FILE);
    }
    Ok(ImageSet::new(faces, BACK_LABEL.to_string()))
}

/// Numbered labels standing in for images when no asset folder is given.
pub(crate) fn placeholder_images(count: usize) -> ImageSet<String> {
    let faces = (1..=count).map(|n| format!("{:02}", n)).collect();
    ImageSet::new(faces, BACK_LABEL.to_string())
}

/// Rings the terminal bell for every event whose sound file exists.
#[derive(Clone, Debug, Default)]
pub(crate) struct TerminalBell {
    available: Vec<SoundEvent>,
}

impl TerminalBell {
    pub(crate) fn from_dir(dir: Option<&Path>) -> Self {
        let Some(sounds_dir) = dir.map(|dir| dir.join("sounds")) else {
            return Self::default();
        };
        let available: Vec<_> = SoundEvent::ALL
            .into_iter()
            .filter(|event| sounds_dir.join(event.file_name()).is_file())
            .collect();
        log::debug!("Sounds available: {:?}", available);
        Self { available }
    }
}

impl SoundSink for TerminalBell {
    fn play(&mut self, event: SoundEvent) {
        if !self.available.contains(&event) {
            return;
        }
        let mut out = std::io::stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            log::trace!("bell for {:?} failed: {}", event, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairflip_core::AssetProvider;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("pairflip-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn placeholders_are_numbered() {
        let images = placeholder_images(3);

        assert_eq!(images.faces(), &["01", "02", "03"]);
        assert_eq!(images.back(), BACK_LABEL);
    }

    #[test]
    fn missing_images_folder_is_fatal() {
        let dir = temp_dir("no-images");

        assert!(load_images(&dir).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn loads_sorted_pngs_without_back() {
        let dir = temp_dir("images");
        let images_dir = dir.join("images");
        std::fs::create_dir_all(&images_dir).unwrap();
        for name in ["moon.png", "cat.png", "back.png", "notes.txt"] {
            std::fs::write(images_dir.join(name), b"").unwrap();
        }

        let images = load_images(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(images.faces(), &["cat", "moon"]);
    }

    #[test]
    fn bell_only_knows_present_sounds() {
        let dir = temp_dir("sounds");
        let sounds_dir = dir.join("sounds");
        std::fs::create_dir_all(&sounds_dir).unwrap();
        std::fs::write(sounds_dir.join("match.wav"), b"").unwrap();

        let bell = TerminalBell::from_dir(Some(&dir));
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(bell.available, vec![SoundEvent::Match]);
        assert!(TerminalBell::from_dir(None).available.is_empty());
    }
}

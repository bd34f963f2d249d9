use pickscan::{PickScanError, PickScanResult, Template, TemplateSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TEMPLATE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const GUIDE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Loads icon templates from files named `<identity>_<display name>.<ext>`.
pub struct DirTemplateSource {
    dir: PathBuf,
}

impl DirTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateSource for DirTemplateSource {
    fn templates(&mut self) -> PickScanResult<Vec<Template>> {
        let mut templates = Vec::new();
        for path in files_with_extension(&self.dir, &TEMPLATE_EXTENSIONS)? {
            let Some((identity, name)) = parse_template_filename(&path) else {
                warn!(path = %path.display(), "skipping icon with unexpected file name");
                continue;
            };
            let loaded = fs::read(&path)
                .map_err(|err| PickScanError::Decode {
                    reason: err.to_string(),
                })
                .and_then(|bytes| Template::from_encoded(identity, name, &bytes));
            match loaded {
                Ok(template) => templates.push(template),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping icon"),
            }
        }

        if templates.is_empty() {
            return Err(PickScanError::TemplateSource {
                reason: format!("no usable icons in {}", self.dir.display()),
            });
        }
        info!(count = templates.len(), "loaded templates");
        Ok(templates)
    }
}

/// Splits `16000000_El Primo.png` into `(16000000, "El Primo")`.
pub fn parse_template_filename(path: &Path) -> Option<(u32, String)> {
    let stem = path.file_stem()?.to_str()?;
    let (identity, name) = stem.split_once('_')?;
    let identity = identity.parse().ok()?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((identity, name.to_string()))
}

/// Screenshots found directly inside `dir`, sorted by path.
pub fn guide_images(dir: &Path) -> PickScanResult<Vec<PathBuf>> {
    files_with_extension(dir, &GUIDE_EXTENSIONS)
}

fn files_with_extension(dir: &Path, extensions: &[&str]) -> PickScanResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| PickScanError::TemplateSource {
        reason: format!("{}: {err}", dir.display()),
    })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::{guide_images, parse_template_filename, DirTemplateSource};
    use pickscan::io::encode_png;
    use pickscan::{PickScanError, TemplateSource};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pickscan-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn icon_png(seed: u8) -> Vec<u8> {
        let img = image::RgbImage::from_fn(8, 8, |x, y| {
            image::Rgb([(x as u8 * 31) ^ seed, (y as u8 * 17) ^ seed, seed])
        });
        encode_png(&img).unwrap()
    }

    #[test]
    fn parses_identity_and_display_name() {
        assert_eq!(
            parse_template_filename(Path::new("icons/16000000_El Primo.png")),
            Some((16000000, "El Primo".to_string()))
        );
        assert_eq!(parse_template_filename(Path::new("Shelly.png")), None);
        assert_eq!(parse_template_filename(Path::new("abc_Shelly.png")), None);
        assert_eq!(parse_template_filename(Path::new("12_.png")), None);
    }

    #[test]
    fn bad_icons_are_skipped() {
        let dir = scratch_dir("icons");
        fs::write(dir.join("1_Shelly.png"), icon_png(3)).unwrap();
        fs::write(dir.join("2_Colt.png"), b"not a png").unwrap();
        fs::write(dir.join("readme.png"), icon_png(5)).unwrap();
        fs::write(dir.join("3_Bull.txt"), b"ignored").unwrap();

        let templates = DirTemplateSource::new(&dir).templates().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].identity(), 1);
        assert_eq!(&**templates[0].display_name(), "Shelly");
        assert_eq!(templates[0].size(), (8, 8));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = scratch_dir("no-icons");
        let err = DirTemplateSource::new(&dir).templates().unwrap_err();
        assert!(matches!(err, PickScanError::TemplateSource { .. }));
    }

    #[test]
    fn guide_scan_filters_and_sorts() {
        let dir = scratch_dir("guides");
        for name in ["b.JPG", "a.png", "c.gif", "notes.txt"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        let names: Vec<String> = guide_images(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.png", "b.JPG", "c.gif"]);
    }
}

/// Command-line options for the terminal renderer
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: softraster-terminal [MESH.obj] [TEXTURE] [--config FILE.toml] [--demo]

  MESH.obj          Wavefront OBJ mesh (default from config: lee.obj)
  TEXTURE           TGA, PNG or BMP texture (default from config: color.tga)
  --config FILE     Load render settings from a TOML file
  --demo            Render a built-in checkerboard cube instead of loading assets

Controls: arrows move the eye, WASD move the look-at point, F/G widen/narrow
the field of view, Q/Esc quit.";

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG: &str = "softraster.toml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    pub mesh: Option<PathBuf>,
    pub texture: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub demo: bool,
    pub help: bool,
}

impl LaunchOptions {
    /// Parse arguments, excluding the program name
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| format!("{arg} expects a file path"))?;
                    options.config = Some(PathBuf::from(path));
                }
                "--demo" => options.demo = true,
                "--help" | "-h" => options.help = true,
                flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
                _ if options.mesh.is_none() => options.mesh = Some(PathBuf::from(&arg)),
                _ if options.texture.is_none() => options.texture = Some(PathBuf::from(&arg)),
                _ => return Err(format!("unexpected argument {arg}")),
            }
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let options = LaunchOptions::parse(Vec::<String>::new()).unwrap();
        assert_eq!(options, LaunchOptions::default());
    }

    #[test]
    fn test_positional_assets_and_config() {
        let options =
            LaunchOptions::parse(["lee.obj", "--config", "scene.toml", "color.tga"]).unwrap();
        assert_eq!(options.mesh, Some(PathBuf::from("lee.obj")));
        assert_eq!(options.texture, Some(PathBuf::from("color.tga")));
        assert_eq!(options.config, Some(PathBuf::from("scene.toml")));
        assert!(!options.demo);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(LaunchOptions::parse(["--config"]).is_err());
        assert!(LaunchOptions::parse(["--fast"]).is_err());
        assert!(LaunchOptions::parse(["a.obj", "b.tga", "c"]).is_err());
    }

    #[test]
    fn test_flags() {
        let options = LaunchOptions::parse(["--demo", "-h"]).unwrap();
        assert!(options.demo);
        assert!(options.help);
    }
}

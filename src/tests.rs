#[cfg(test)]
mod fixtures {
    use crate::core::config_file::PipelineConfig;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub const STAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path d="M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z"/>
</svg>"#;

    pub const HOME: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24">
  <title>home</title>
  <path d="M10 20v-6h4v6h5v-8h3L12 3 2 12h3v8z"/>
</svg>"#;

    pub const DOT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <g transform="translate(10 0)"><circle cx="40" cy="50" r="30"/></g>
</svg>"#;

    /// Illustrator-style export: styling through a class, a shape reused via `use`
    pub const EXPORTED: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 24 24">
  <style>.st0{fill:none}</style>
  <rect class="st0" width="24" height="24"/>
  <defs><circle id="dot" cx="12" cy="12" r="4"/></defs>
  <use xlink:href="#dot"/>
</svg>"##;

    /// A project directory with an `icons/` folder and an output directory
    pub struct Project {
        pub dir: TempDir,
    }

    impl Project {
        pub fn new(icons: &[(&str, &str)]) -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::create_dir(dir.path().join("icons")).unwrap();
            for (name, contents) in icons {
                std::fs::write(dir.path().join("icons").join(name), contents).unwrap();
            }
            Self { dir }
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        pub fn out(&self) -> PathBuf {
            self.path().join("dist")
        }

        pub fn config(&self) -> PipelineConfig {
            let pattern = format!("{}/icons/*.svg", self.path().display());
            let mut config = PipelineConfig::new(pattern, "demo-icons", self.out()).unwrap();
            config.timestamp = Some(1_700_000_000);
            config.autohint = false;
            config
        }

        pub fn read(&self, name: &str) -> String {
            std::fs::read_to_string(self.out().join(name)).unwrap()
        }

        pub fn read_bytes(&self, name: &str) -> Vec<u8> {
            std::fs::read(self.out().join(name)).unwrap()
        }
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::fixtures::*;
    use crate::font::eot::unwrap_eot;
    use crate::pipeline::{generate, CssStatus};

    #[tokio::test]
    async fn test_demo_icons_scenario() {
        let project = Project::new(&[("star.svg", STAR), ("home.svg", HOME)]);
        let report = generate(&project.config()).await.unwrap();

        for name in [
            "demo-icons.ttf",
            "demo-icons.eot",
            "demo-icons.woff",
            "demo-icons.scss",
            "demo-icons-gallery.css",
            "demo-icons.html",
        ] {
            assert!(project.out().join(name).is_file(), "{name} was not written");
        }
        assert!(!project.out().join("demo-icons.svg").exists());
        assert_eq!(report.manifest.len(), 2);
        assert_eq!(report.fonts.len(), 3);
        assert!(matches!(report.css, CssStatus::Compiled(_)));

        let scss = project.read("demo-icons.scss");
        assert!(scss.contains(".icon-star:before"));
        assert!(scss.contains(".icon-home:before"));

        let css = project.read("demo-icons-gallery.css");
        assert!(css.contains(".icon-star:before"));
        assert!(css.contains("@font-face"));

        let html = project.read("demo-icons.html");
        assert!(html.contains("icon-star"));
        assert!(html.contains("icon-home"));
    }

    #[tokio::test]
    async fn test_codepoints_follow_file_order() {
        let project = Project::new(&[("star.svg", STAR), ("home.svg", HOME)]);
        generate(&project.config()).await.unwrap();

        let ttf = project.read_bytes("demo-icons.ttf");
        let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
        assert_eq!(face.number_of_glyphs(), 3);

        // home.svg sorts before star.svg
        for (codepoint, name) in [('\u{EA01}', "home"), ('\u{EA02}', "star")] {
            let glyph = face.glyph_index(codepoint).unwrap();
            assert_eq!(face.glyph_name(glyph), Some(name));
            assert_eq!(face.glyph_hor_advance(glyph), Some(150));
            let bbox = face.glyph_bounding_box(glyph).unwrap();
            assert!(bbox.y_max <= 150 && bbox.y_min >= 0);
        }
    }

    #[tokio::test]
    async fn test_all_formats_share_the_glyph_table() {
        let project = Project::new(&[("star.svg", STAR), ("home.svg", HOME), ("dot.svg", DOT)]);
        let mut config = project.config();
        config.formats.push(crate::font::FontFormat::Svg);
        generate(&config).await.unwrap();

        let ttf = project.read_bytes("demo-icons.ttf");
        let eot = project.read_bytes("demo-icons.eot");
        assert_eq!(unwrap_eot(&eot).unwrap(), ttf.as_slice());

        let woff = project.read_bytes("demo-icons.woff");
        assert_eq!(&woff[..4], b"wOFF");
        assert_eq!(u16::from_be_bytes([woff[12], woff[13]]), 10);

        let svg_font = project.read("demo-icons.svg");
        assert_eq!(svg_font.matches("<glyph ").count(), 3);
        assert!(svg_font.contains("glyph-name=\"dot\""));

        let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
        assert_eq!(face.number_of_glyphs(), 4);
    }

    #[tokio::test]
    async fn test_fixed_timestamp_is_idempotent() {
        let project = Project::new(&[("star.svg", STAR), ("home.svg", HOME)]);
        let config = project.config();

        generate(&config).await.unwrap();
        let first: Vec<Vec<u8>> = report_files()
            .iter()
            .map(|name| project.read_bytes(name))
            .collect();

        generate(&config).await.unwrap();
        let second: Vec<Vec<u8>> = report_files()
            .iter()
            .map(|name| project.read_bytes(name))
            .collect();

        assert_eq!(first, second);
    }

    fn report_files() -> [&'static str; 6] {
        [
            "demo-icons.ttf",
            "demo-icons.eot",
            "demo-icons.woff",
            "demo-icons.scss",
            "demo-icons-gallery.css",
            "demo-icons.html",
        ]
    }

    #[tokio::test]
    async fn test_empty_source_directory() {
        let project = Project::new(&[]);
        let report = generate(&project.config()).await.unwrap();

        assert!(report.manifest.is_empty());
        let ttf = project.read_bytes("demo-icons.ttf");
        let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
        assert_eq!(face.number_of_glyphs(), 1);

        assert!(!project.read("demo-icons.scss").contains(":before"));
        assert!(project.read("demo-icons.html").contains("0 icons"));
    }

    #[tokio::test]
    async fn test_stylesheet_names_appear_in_gallery() {
        let project = Project::new(&[("star.svg", STAR), ("home.svg", HOME), ("dot.svg", DOT)]);
        generate(&project.config()).await.unwrap();

        let scss = project.read("demo-icons.scss");
        let html = project.read("demo-icons.html");
        let names: Vec<&str> = scss
            .lines()
            .filter_map(|line| line.strip_prefix(".icon-"))
            .filter_map(|line| line.strip_suffix(":before {"))
            .collect();

        assert_eq!(names.len(), 3);
        for name in names {
            assert!(html.contains(&format!("id=\"{name}\"")), "{name} missing from gallery");
        }
    }

    #[tokio::test]
    async fn test_pinned_codepoint() {
        let project = Project::new(&[("uE900-pinned.svg", DOT), ("star.svg", STAR)]);
        let report = generate(&project.config()).await.unwrap();

        let names: Vec<&str> = report.manifest.names().collect();
        assert_eq!(names, vec!["star", "pinned"]);

        let ttf = project.read_bytes("demo-icons.ttf");
        let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
        let pinned = face.glyph_index('\u{E900}').unwrap();
        assert_eq!(face.glyph_name(pinned), Some("pinned"));
        let star = face.glyph_index('\u{EA01}').unwrap();
        assert_eq!(face.glyph_name(star), Some("star"));
    }

    #[tokio::test]
    async fn test_malformed_svg_aborts() {
        let project = Project::new(&[("star.svg", STAR), ("broken.svg", "<svg><path></svg>")]);
        let error = generate(&project.config()).await.unwrap_err();

        assert!(error.to_string().contains("broken.svg"));
        assert!(!project.out().join("demo-icons.ttf").exists());
    }

    #[tokio::test]
    async fn test_template_error_aborts() {
        let project = Project::new(&[("star.svg", STAR)]);
        let template = project.path().join("broken.scss.tera");
        std::fs::write(&template, "{{ no_such_variable }}").unwrap();

        let mut config = project.config();
        config.stylesheet_template = Some(template);
        assert!(generate(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_scss_failure_is_soft() {
        let project = Project::new(&[("star.svg", STAR)]);
        let template = project.path().join("invalid.scss.tera");
        std::fs::write(&template, ".{{ class_name }} { color: ").unwrap();

        let mut config = project.config();
        config.stylesheet_template = Some(template);
        let report = generate(&config).await.unwrap();

        assert!(matches!(report.css, CssStatus::Failed(_)));
        assert!(!project.out().join("demo-icons-gallery.css").exists());
        assert!(project.out().join("demo-icons.html").is_file());
        assert!(report.summary().contains("css FAILED"));
    }

    #[tokio::test]
    async fn test_invalid_font_name_touches_nothing() {
        let project = Project::new(&[("star.svg", STAR)]);
        let mut config = project.config();
        config.font_name = "demo icons".to_string();

        assert!(generate(&config).await.is_err());
        assert!(!project.out().exists());
    }

    #[tokio::test]
    async fn test_exported_svg_keeps_only_painted_shapes() {
        let project = Project::new(&[("dot.svg", EXPORTED)]);
        let mut config = project.config();
        config.metrics.center_horizontally = false;
        generate(&config).await.unwrap();

        let ttf = project.read_bytes("demo-icons.ttf");
        let face = ttf_parser::Face::parse(&ttf, 0).unwrap();
        let dot = face.glyph_index('\u{EA01}').unwrap();
        // the circle spans 8 of 24 units, not the whole invisible frame
        let bbox = face.glyph_bounding_box(dot).unwrap();
        assert!((45..=55).contains(&bbox.x_min), "{bbox:?}");
        assert!((95..=105).contains(&bbox.x_max), "{bbox:?}");
    }

    #[tokio::test]
    async fn test_punctuated_names_are_escaped_in_css() {
        let project = Project::new(&[("arrow.left.svg", STAR)]);
        let report = generate(&project.config()).await.unwrap();

        assert!(matches!(report.css, CssStatus::Compiled(_)));
        assert!(project.read("demo-icons.scss").contains(".icon-arrow\\.left:before"));
        assert!(project.read("demo-icons.html").contains("icon icon-arrow.left"));
    }

    #[tokio::test]
    async fn test_whitespace_in_names_aborts() {
        let project = Project::new(&[("arrow left.svg", STAR)]);
        let error = generate(&project.config()).await.unwrap_err();
        assert!(error.to_string().contains("arrow left"));
    }

    #[tokio::test]
    async fn test_custom_class_and_paths() {
        let project = Project::new(&[("star.svg", STAR)]);
        let mut config = project.config();
        config.class_name = "gt".to_string();
        config.font_path = "../fonts/".to_string();
        generate(&config).await.unwrap();

        let scss = project.read("demo-icons.scss");
        assert!(scss.contains(".gt-star:before"));
        assert!(scss.contains("url(\"../fonts/demo-icons.woff\")"));
    }
}

#[cfg(test)]
mod ufo_tests {
    use super::fixtures::*;
    use crate::data::ufo;
    use crate::pipeline::generate;

    #[tokio::test]
    async fn test_ufo_export_round_trip() {
        let project = Project::new(&[("star.svg", STAR), ("dot.svg", DOT)]);
        let mut config = project.config();
        config.export_ufo = true;
        let report = generate(&config).await.unwrap();

        let path = report.ufo.unwrap();
        let font = ufo::load_ufo_from_path(&path).unwrap();
        assert_eq!(font.font_info.family_name.as_deref(), Some("demo-icons"));
        assert_eq!(font.default_layer().len(), 2);

        let star = font.default_layer().get_glyph("star").unwrap();
        assert_eq!(star.width, 150.0);
        assert!(star.codepoints.contains('\u{EA02}'));
        assert!(!star.contours.is_empty());
    }
}

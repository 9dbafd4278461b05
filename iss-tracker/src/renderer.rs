///! World map renderer
///!
///! Builds the ISS map on a turtle [`Screen`] and rasterises it to PNG
use crate::canvas::{Screen, Shape, TurtleId};
use crate::config::AssetConfig;
use crate::error::GraphicsError;
use iss_common::GeoCoordinate;
use resvg::tiny_skia;
use resvg::usvg::{fontdb, Options, Tree};
use std::path::{Path, PathBuf};

const MAP_SVG_TEMPLATE: &str = include_str!("../resources/map_template.svg");

pub struct MapRenderer {
    assets: AssetConfig,
    output_dir: PathBuf,
}

impl MapRenderer {
    pub const WIDTH: u32 = 720;
    pub const HEIGHT: u32 = 360;
    pub const OUTPUT_FILE: &'static str = "iss_map.png";
    const BACKGROUND_COLOR: &'static str = "#ffffff";
    const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    pub fn new(assets: AssetConfig, output_dir: impl AsRef<Path>) -> Self {
        Self {
            assets,
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Draw the world map and place the ISS icon at `position`
    ///
    /// Returns the screen so more can be drawn on it before [`Self::render`]
    pub fn map_iss(&self, position: GeoCoordinate) -> Result<(Screen, TurtleId), GraphicsError> {
        let mut screen = Screen::setup(Self::WIDTH, Self::HEIGHT);
        screen.bgpic(&self.assets.map_image)?;
        screen.set_world_coordinates(
            GeoCoordinate::LON_MIN,
            GeoCoordinate::LAT_MIN,
            GeoCoordinate::LON_MAX,
            GeoCoordinate::LAT_MAX,
        );

        let icon: Shape = screen.register_shape(&self.assets.iss_icon)?;
        let iss = screen.new_turtle();
        let turtle = screen.turtle(iss);
        turtle.shape(icon);
        turtle.set_heading(90.0);
        turtle.pen_up();
        turtle.goto(position.longitude(), position.latitude());

        tracing::debug!("Placed ISS icon at {}", position);
        Ok((screen, iss))
    }

    /// Fill the SVG template from the screen's contents
    pub fn build_svg(&self, screen: &Screen) -> String {
        MAP_SVG_TEMPLATE
            .replace("{{WIDTH}}", &screen.width().to_string())
            .replace("{{HEIGHT}}", &screen.height().to_string())
            .replace("{{BACKGROUND_COLOR}}", Self::BACKGROUND_COLOR)
            .replace("{{BACKGROUND}}", &screen.background_svg())
            .replace("{{CONTENT}}", &screen.content_svg())
    }

    /// Rasterise `screen` into `<output_dir>/iss_map.png`
    pub async fn render(&self, screen: &Screen) -> Result<PathBuf, GraphicsError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| GraphicsError::Output {
                path: self.output_dir.clone(),
                detail: e.to_string(),
            })?;

        let output_path = self.output_dir.join(Self::OUTPUT_FILE);
        let svg = self.build_svg(screen);
        render_svg_to_png(&svg, &self.assets.fonts_dir, Self::DEFAULT_FONT_FAMILY, &output_path).await?;

        tracing::info!("Generated ISS map image: {:?}", output_path);
        Ok(output_path)
    }
}

/// Render SVG to PNG
async fn render_svg_to_png(
    svg_content: &str,
    fonts_dir: &Path,
    font_family: &str,
    output_path: &Path,
) -> Result<(), GraphicsError> {
    // System fonts first, then anything shipped next to the binary
    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();
    if fonts_dir.is_dir() {
        fontdb.load_fonts_dir(fonts_dir);
    }
    tracing::debug!("Loaded {} font faces", fontdb.len());

    let mut options = Options::default();
    options.font_family = font_family.to_string();
    options.fontdb = std::sync::Arc::new(fontdb);

    let tree = Tree::from_str(svg_content, &options)
        .map_err(|e| GraphicsError::Svg(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(GraphicsError::Pixmap { width, height })?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap.save_png(output_path).map_err(|e| GraphicsError::Output {
        path: output_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scratch_dir, write_png};

    fn renderer_with_assets(name: &str) -> (MapRenderer, PathBuf) {
        let dir = scratch_dir(name);
        let map = dir.join("map.png");
        let icon = dir.join("iss.png");
        write_png(&map, 720, 360, [0, 0, 255, 255]);
        write_png(&icon, 16, 16, [255, 0, 0, 255]);

        let assets = AssetConfig {
            map_image: map,
            iss_icon: icon,
            fonts_dir: dir.join("fonts"),
        };
        (MapRenderer::new(assets, dir.join("out")), dir)
    }

    #[test]
    fn test_map_iss_places_icon() {
        let (renderer, dir) = renderer_with_assets("iss_tracker_map_iss_test");
        let position = GeoCoordinate::new(45.0, -90.0).unwrap();

        let (mut screen, iss) = renderer.map_iss(position).unwrap();
        assert_eq!(screen.turtle(iss).position(), (-90.0, 45.0));
        assert_eq!(screen.turtle(iss).heading(), 90.0);

        let svg = renderer.build_svg(&screen);
        assert!(svg.contains(r#"width="720" height="360""#));
        assert!(svg.contains("map.png"));
        // 32px icon box centred on (180, 90)
        assert!(svg.contains(r#"<image x="164.00" y="74.00""#));
        assert!(!svg.contains("{{"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_map_iss_missing_map() {
        let (mut renderer, dir) = renderer_with_assets("iss_tracker_map_missing_test");
        renderer.assets.map_image = dir.join("no_such_map.gif");

        let position = GeoCoordinate::new(0.0, 0.0).unwrap();
        match renderer.map_iss(position) {
            Err(GraphicsError::MissingAsset(path)) => assert!(path.ends_with("no_such_map.gif")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected a missing asset error"),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_render_png_pixels() {
        let (renderer, dir) = renderer_with_assets("iss_tracker_render_png_test");
        let position = GeoCoordinate::new(0.0, 0.0).unwrap();

        let (mut screen, _) = renderer.map_iss(position).unwrap();
        let marker = screen.new_turtle();
        let turtle = screen.turtle(marker);
        turtle.pen_up();
        turtle.color("yellow");
        turtle.goto(-90.0, 45.0);
        turtle.dot(5.0, None);
        turtle.hide_turtle();

        let path = renderer.render(&screen).await.unwrap();
        assert_eq!(path, dir.join("out").join(MapRenderer::OUTPUT_FILE));

        let png = tiny_skia::Pixmap::load_png(&path).unwrap();
        assert_eq!((png.width(), png.height()), (720, 360));

        // ISS icon over the map centre
        let icon = png.pixel(360, 180).unwrap();
        assert_eq!((icon.red(), icon.green(), icon.blue()), (255, 0, 0));

        // Background map elsewhere
        let sea = png.pixel(20, 20).unwrap();
        assert_eq!((sea.red(), sea.green(), sea.blue()), (0, 0, 255));

        // Yellow dot at (-90, 45) -> pixel (180, 90)
        let dot = png.pixel(180, 90).unwrap();
        assert_eq!((dot.red(), dot.green(), dot.blue()), (255, 255, 0));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

///! Turtle-style drawing surface
///!
///! A [`Screen`] owns a fixed-size pixel area, an optional background image
///! and any number of [`Turtle`]s. Turtles move in world coordinates and
///! leave marks (lines, dots, text); the screen projects everything to pixels
///! and emits an SVG body for the renderer to rasterise.
use crate::error::GraphicsError;
use imagesize::ImageType;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Edge length of the square box an image shape is fitted into, in pixels
pub const IMAGE_SHAPE_SIZE: f64 = 32.0;

const CLASSIC_SHAPE_LENGTH: f64 = 14.0;

/// Lower-left and upper-right corners of the world coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn text_anchor(self) -> &'static str {
        match self {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    /// "normal", "bold", "italic"
    pub style: String,
}

impl Font {
    pub fn new(family: &str, size: f32, style: &str) -> Self {
        Self {
            family: family.to_string(),
            size,
            style: style.to_string(),
        }
    }

    fn svg_attributes(&self) -> String {
        let (weight, slant) = match self.style.as_str() {
            "bold" => ("bold", "normal"),
            "italic" => ("normal", "italic"),
            _ => ("normal", "normal"),
        };
        format!(
            r#"font-family="{}" font-size="{}" font-weight="{}" font-style="{}""#,
            escape_xml(&self.family),
            self.size,
            weight,
            slant
        )
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Arial", 8.0, "normal")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Arrow head pointing along the heading
    Classic,
    /// Registered image, drawn unrotated and centred on the turtle
    Image(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: String,
        width: f64,
    },
    Dot {
        at: (f64, f64),
        diameter: f64,
        color: String,
    },
    Text {
        at: (f64, f64),
        text: String,
        align: Align,
        font: Font,
        color: String,
    },
}

/// A cursor in world coordinates that leaves marks behind it
#[derive(Debug, Clone)]
pub struct Turtle {
    position: (f64, f64),
    /// Degrees counter-clockwise from east
    heading: f64,
    pen_down: bool,
    pen_width: f64,
    color: String,
    shape: Shape,
    visible: bool,
    marks: Vec<Mark>,
}

impl Default for Turtle {
    fn default() -> Self {
        Self {
            position: (0.0, 0.0),
            heading: 0.0,
            pen_down: true,
            pen_width: 1.0,
            color: "black".to_string(),
            shape: Shape::Classic,
            visible: true,
            marks: Vec::new(),
        }
    }
}

impl Turtle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    pub fn set_heading(&mut self, degrees: f64) {
        self.heading = degrees.rem_euclid(360.0);
    }

    pub fn color(&mut self, color: &str) {
        self.color = color.to_string();
    }

    pub fn shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn hide_turtle(&mut self) {
        self.visible = false;
    }

    pub fn show_turtle(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Move to `(x, y)`, drawing a line when the pen is down
    pub fn goto(&mut self, x: f64, y: f64) {
        if self.pen_down {
            self.marks.push(Mark::Line {
                from: self.position,
                to: (x, y),
                color: self.color.clone(),
                width: self.pen_width,
            });
        }
        self.position = (x, y);
    }

    /// Filled circle of `diameter` pixels at the current position
    pub fn dot(&mut self, diameter: f64, color: Option<&str>) {
        self.marks.push(Mark::Dot {
            at: self.position,
            diameter,
            color: color.unwrap_or(&self.color).to_string(),
        });
    }

    /// Text anchored at the current position
    pub fn write(&mut self, text: &str, align: Align, font: Font) {
        self.marks.push(Mark::Text {
            at: self.position,
            text: text.to_string(),
            align,
            font,
            color: self.color.clone(),
        });
    }
}

/// Index of a turtle owned by a [`Screen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurtleId(usize);

pub struct Screen {
    width: u32,
    height: u32,
    world: WorldBounds,
    background: Option<PathBuf>,
    shapes: Vec<PathBuf>,
    turtles: Vec<Turtle>,
}

impl Screen {
    /// A `width`x`height` pixel screen whose world coordinates are centred pixels
    pub fn setup(width: u32, height: u32) -> Self {
        let (half_w, half_h) = (width as f64 / 2.0, height as f64 / 2.0);
        Self {
            width,
            height,
            world: WorldBounds {
                llx: -half_w,
                lly: -half_h,
                urx: half_w,
                ury: half_h,
            },
            background: None,
            shapes: Vec::new(),
            turtles: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn world(&self) -> WorldBounds {
        self.world
    }

    pub fn background(&self) -> Option<&Path> {
        self.background.as_deref()
    }

    pub fn set_world_coordinates(&mut self, llx: f64, lly: f64, urx: f64, ury: f64) {
        self.world = WorldBounds { llx, lly, urx, ury };
    }

    /// Use the image at `path` as the background
    pub fn bgpic(&mut self, path: impl AsRef<Path>) -> Result<(), GraphicsError> {
        self.background = Some(resolve_asset(path.as_ref())?);
        Ok(())
    }

    /// Make the image at `path` available as a turtle shape
    pub fn register_shape(&mut self, path: impl AsRef<Path>) -> Result<Shape, GraphicsError> {
        let resolved = resolve_asset(path.as_ref())?;
        if !self.shapes.contains(&resolved) {
            self.shapes.push(resolved.clone());
        }
        Ok(Shape::Image(resolved))
    }

    pub fn new_turtle(&mut self) -> TurtleId {
        self.turtles.push(Turtle::new());
        TurtleId(self.turtles.len() - 1)
    }

    pub fn turtle(&mut self, id: TurtleId) -> &mut Turtle {
        &mut self.turtles[id.0]
    }

    /// Project world coordinates to pixel coordinates (y grows downwards)
    pub fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        let w = &self.world;
        let px = (x - w.llx) * self.width as f64 / (w.urx - w.llx);
        let py = (w.ury - y) * self.height as f64 / (w.ury - w.lly);
        (px, py)
    }

    /// SVG `<image>` element for the background, stretched over the whole screen
    pub fn background_svg(&self) -> String {
        match &self.background {
            Some(path) => format!(
                r#"<image x="0" y="0" width="{}" height="{}" preserveAspectRatio="none" href="{}"/>"#,
                self.width,
                self.height,
                escape_xml(&path.to_string_lossy())
            ),
            None => String::new(),
        }
    }

    /// SVG elements for every turtle's marks, then every visible turtle's shape on top
    pub fn content_svg(&self) -> String {
        let mut out = String::new();

        for turtle in &self.turtles {
            for mark in &turtle.marks {
                self.write_mark(&mut out, mark);
            }
        }

        for turtle in self.turtles.iter().filter(|t| t.visible) {
            self.write_shape(&mut out, turtle);
        }

        out
    }

    fn write_mark(&self, out: &mut String, mark: &Mark) {
        match mark {
            Mark::Line { from, to, color, width } => {
                let (x1, y1) = self.to_pixels(from.0, from.1);
                let (x2, y2) = self.to_pixels(to.0, to.1);
                let _ = writeln!(
                    out,
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
                    x1, y1, x2, y2, escape_xml(color), width
                );
            }
            Mark::Dot { at, diameter, color } => {
                let (cx, cy) = self.to_pixels(at.0, at.1);
                let _ = writeln!(
                    out,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
                    cx,
                    cy,
                    diameter / 2.0,
                    escape_xml(color)
                );
            }
            Mark::Text { at, text, align, font, color } => {
                let (x, y) = self.to_pixels(at.0, at.1);
                let _ = writeln!(
                    out,
                    r#"<text x="{:.2}" y="{:.2}" text-anchor="{}" {} fill="{}">{}</text>"#,
                    x,
                    y,
                    align.text_anchor(),
                    font.svg_attributes(),
                    escape_xml(color),
                    escape_xml(text)
                );
            }
        }
    }

    fn write_shape(&self, out: &mut String, turtle: &Turtle) {
        let (x, y) = self.to_pixels(turtle.position.0, turtle.position.1);
        match &turtle.shape {
            Shape::Image(path) => {
                let half = IMAGE_SHAPE_SIZE / 2.0;
                let _ = writeln!(
                    out,
                    r#"<image x="{:.2}" y="{:.2}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" href="{}"/>"#,
                    x - half,
                    y - half,
                    IMAGE_SHAPE_SIZE,
                    IMAGE_SHAPE_SIZE,
                    escape_xml(&path.to_string_lossy())
                );
            }
            Shape::Classic => {
                // Arrow pointing east, rotated to the heading (SVG angles run clockwise)
                let l = CLASSIC_SHAPE_LENGTH;
                let _ = writeln!(
                    out,
                    r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}" transform="rotate({:.2} {:.2} {:.2})"/>"#,
                    x + l / 2.0,
                    y,
                    x - l / 2.0,
                    y - l / 3.0,
                    x - l / 4.0,
                    y,
                    x - l / 2.0,
                    y + l / 3.0,
                    escape_xml(&turtle.color),
                    -turtle.heading,
                    x,
                    y
                );
            }
        }
    }
}

/// Canonicalise an image path and make sure it holds a PNG, JPEG or GIF
///
/// resvg drops `<image>` elements it cannot load without reporting anything,
/// so a bad asset has to be caught here.
fn resolve_asset(path: &Path) -> Result<PathBuf, GraphicsError> {
    let resolved = std::fs::canonicalize(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => GraphicsError::MissingAsset(path.to_path_buf()),
        _ => GraphicsError::UnreadableAsset {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if !resolved.is_file() {
        return Err(GraphicsError::UnreadableAsset {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let data = std::fs::read(&resolved).map_err(|source| GraphicsError::UnreadableAsset {
        path: path.to_path_buf(),
        source,
    })?;

    let undecodable = |detail: String| GraphicsError::UndecodableAsset {
        path: path.to_path_buf(),
        detail,
    };

    match imagesize::image_type(&data).map_err(|e| undecodable(e.to_string()))? {
        ImageType::Png | ImageType::Jpeg | ImageType::Gif => {}
        other => return Err(undecodable(format!("unsupported image format {:?}", other))),
    }

    let size = imagesize::blob_size(&data).map_err(|e| undecodable(e.to_string()))?;
    if size.width == 0 || size.height == 0 {
        return Err(undecodable(format!("empty image {}x{}", size.width, size.height)));
    }

    Ok(resolved)
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

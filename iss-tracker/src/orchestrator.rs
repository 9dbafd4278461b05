///! Runs one tracking pass: crew, position, map with next-pass label
use crate::canvas::{Align, Font};
use crate::client::OpenNotifyClient;
use crate::config::TrackerConfig;
use crate::error::GraphicsError;
use crate::renderer::MapRenderer;
use anyhow::{Context, Result};
use iss_common::{AstronautRecord, GeoCoordinate, RiseTime};
use std::io::Write;
use std::path::{Path, PathBuf};

const REFERENCE_DOT_SIZE: f64 = 5.0;
const REFERENCE_COLOR: &str = "yellow";

/// What a run produced
#[derive(Debug, Clone)]
pub struct TrackerReport {
    pub astronauts: Vec<AstronautRecord>,
    pub position: GeoCoordinate,
    /// Next rise over the reference location, if the map got that far
    pub next_pass: Option<RiseTime>,
    /// Rendered map, absent when graphics failed
    pub map: Option<PathBuf>,
}

pub struct Tracker {
    client: OpenNotifyClient,
    renderer: MapRenderer,
    reference: GeoCoordinate,
}

impl Tracker {
    pub fn new(client: OpenNotifyClient, renderer: MapRenderer, reference: GeoCoordinate) -> Self {
        Self {
            client,
            renderer,
            reference,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let client = OpenNotifyClient::new(&config.base_url)?;
        let renderer = MapRenderer::new(config.assets.clone(), &config.output_dir);
        let reference = GeoCoordinate::new(config.reference.latitude, config.reference.longitude)
            .context("Invalid reference location in config")?;

        Ok(Self::new(client, renderer, reference))
    }

    /// Directory the map is rendered into
    pub fn map_dir(&self) -> &Path {
        self.renderer.output_dir()
    }

    /// Print the crew and ISS position to `out`, then draw the map
    ///
    /// Graphics failures are reported on `out` and swallowed; every other
    /// error, including a failed rise-time request while drawing, is returned.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<TrackerReport> {
        let astronauts = self.client.get_astronaut_info().await?;
        writeln!(out, "Current people in space: {}", astronauts.len())?;
        for a in &astronauts {
            writeln!(out, " - {} in {}", a.name, a.craft)?;
        }

        let position = self.client.locate_iss().await?;
        writeln!(out, "Current ISS coordinates: {}", position)?;

        let (map, next_pass) = match self.draw_map(position).await {
            Ok((path, rise)) => (Some(path), Some(rise)),
            Err(e) => match e.downcast::<GraphicsError>() {
                Ok(graphics) => {
                    tracing::warn!("Map rendering failed: {}", graphics);
                    writeln!(out, "ERROR: problem loading graphics: {}", graphics)?;
                    (None, None)
                }
                Err(e) => return Err(e),
            },
        };

        Ok(TrackerReport {
            astronauts,
            position,
            next_pass,
            map,
        })
    }

    async fn draw_map(&self, position: GeoCoordinate) -> Result<(PathBuf, RiseTime)> {
        let (mut screen, _iss) = self.renderer.map_iss(position)?;

        let location = screen.new_turtle();
        let marker = screen.turtle(location);
        marker.pen_up();
        marker.color(REFERENCE_COLOR);
        marker.goto(self.reference.longitude(), self.reference.latitude());
        marker.dot(REFERENCE_DOT_SIZE, None);
        marker.hide_turtle();

        let next_pass = self.client.compute_rise_time(self.reference).await?;
        tracing::info!("Next ISS pass over {}: {}", self.reference, next_pass);

        screen.turtle(location).write(
            &next_pass.to_local_string(),
            Align::Center,
            Font::new("Arial", 12.0, "normal"),
        );

        let path = self.renderer.render(&screen).await?;
        Ok((path, next_pass))
    }
}

/// Side-view character plot of the level and the mover's path
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point3;
use std::io::Write;
use slide3d_core::World;

const GEOMETRY: char = '#';
const TRAIL: char = '.';
const PLAYER: char = '@';
const EMPTY: char = ' ';

/// Character buffer looking down the Z axis: X to the right, Y up.
pub struct TracePlot {
    width: usize,
    height: usize,
    /// World units per character cell.
    scale: f32,
    cells: Vec<char>,
}

impl TracePlot {
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            cells: vec![EMPTY; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Draw every triangle edge of `world`, back in world space, centred on `focus`.
    pub fn plot_world(&mut self, world: &World, focus: &Point3<f32>) {
        let radius = world.radius();
        for triangle in world.triangles() {
            let [a, b, c] = triangle
                .points
                .map(|p| Point3::from(p.coords.component_mul(&radius)));
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let steps = ((to - from).norm() / self.scale).ceil().max(1.0) as usize;
                for i in 0..=steps {
                    let p = from + (to - from) * (i as f32 / steps as f32);
                    self.put(&p, focus, GEOMETRY);
                }
            }
        }
    }

    pub fn plot_trail<'a>(&mut self, trail: impl IntoIterator<Item = &'a Point3<f32>>, focus: &Point3<f32>) {
        for p in trail {
            self.put(p, focus, TRAIL);
        }
    }

    pub fn plot_player(&mut self, position: &Point3<f32>) {
        self.put(position, position, PLAYER);
    }

    /// Cell of `point` when the view is centred on `focus`, if on screen.
    pub fn cell(&self, point: &Point3<f32>, focus: &Point3<f32>) -> Option<(usize, usize)> {
        let col = (point.x - focus.x) / self.scale + self.width as f32 / 2.0;
        let row = self.height as f32 / 2.0 - (point.y - focus.y) / self.scale;
        if col < 0.0 || row < 0.0 || col >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        Some((col as usize, row as usize))
    }

    fn put(&mut self, point: &Point3<f32>, focus: &Point3<f32>, c: char) {
        if let Some((col, row)) = self.cell(point, focus) {
            let idx = row * self.width + col;
            // The player is always drawn on top.
            if self.cells[idx] != PLAYER {
                self.cells[idx] = c;
            }
        }
    }

    pub fn at(&self, col: usize, row: usize) -> char {
        self.cells[row * self.width + col]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells.chunks(self.width) {
            for &c in row {
                let color = match c {
                    GEOMETRY => Color::Grey,
                    TRAIL => Color::DarkCyan,
                    PLAYER => Color::Yellow,
                    _ => Color::Reset,
                };
                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Vector3};
    use slide3d_core::Mesh;

    #[test]
    fn test_cell_mapping_centres_focus() {
        let plot = TracePlot::new(20, 10, 0.5);
        let focus = Point3::new(3.0, 1.0, 0.0);
        assert_eq!(plot.cell(&focus, &focus), Some((10, 5)));
        assert_eq!(plot.cell(&Point3::new(4.0, 2.0, 0.0), &focus), Some((12, 3)));
        assert_eq!(plot.cell(&Point3::new(100.0, 1.0, 0.0), &focus), None);
    }

    #[test]
    fn test_player_drawn_over_floor() {
        let world = World::from_mesh(
            &Mesh::floor(5.0, 0.0),
            &Matrix4::identity(),
            Vector3::new(0.4, 1.0, 0.4),
        )
        .unwrap();
        let mut plot = TracePlot::new(20, 10, 0.5);
        let player = Point3::new(0.0, 0.0, 0.0);
        plot.plot_player(&player);
        plot.plot_world(&world, &player);

        assert_eq!(plot.at(10, 5), PLAYER);
        assert_eq!(plot.at(2, 5), GEOMETRY);
        assert_eq!(plot.at(2, 2), EMPTY);
    }

    #[test]
    fn test_draw_emits_every_row() {
        let plot = TracePlot::new(4, 3, 1.0);
        let mut out = Vec::new();
        plot.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 3);
    }
}

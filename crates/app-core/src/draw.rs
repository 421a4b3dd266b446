//! Draw-list composition.
//!
//! The render loop emits an ordered list of `DrawCmd`s instead of touching a
//! drawing context directly; a painter (native wgpu, or anything else that
//! can rasterize circles and text) consumes the list. Painters never hold
//! partially-mutated context state between commands, and the exact draw
//! order is assertable in tests.

use std::sync::Arc;

use glam::Vec2;

use crate::assets::{format_value, LogoImage};
use crate::constants::*;
use crate::scene::Scene;

#[derive(Clone, Debug)]
pub enum DrawCmd {
    Clear {
        color: [f32; 4],
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: [f32; 4],
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    Ring {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
        width: f32,
    },
    Glow {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    Sprite {
        center: Vec2,
        radius: f32,
        image: Arc<LogoImage>,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: [f32; 4],
        centered: bool,
    },
}

/// POD form of a soft-circle draw, uploadable as an instance buffer.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OrbInstance {
    pub center: [f32; 2],
    pub radius: f32,
    /// 0 for a filled disc; the inner edge for a ring.
    pub inner_radius: f32,
    pub color: [f32; 4],
    /// Edge softness in pixels; a value near `radius` reads as a glow.
    pub feather: f32,
    pub _pad: [f32; 3],
}

impl Scene {
    /// Emit the frame's draw list. Read-only: all state was settled by
    /// `advance`, including the depth-sorted order.
    pub fn compose(&self) -> Vec<DrawCmd> {
        let mut cmds = Vec::with_capacity(self.particles.len() + self.orbs.len() * 6 + 32);
        let center_screen = self.viewport.center();

        cmds.push(DrawCmd::Clear {
            color: if self.immersive {
                [0.008, 0.014, 0.032, 1.0]
            } else {
                [0.025, 0.035, 0.07, 1.0]
            },
        });

        if self.immersive {
            self.compose_grid(&mut cmds);
        }

        // Ambient particles, dimmed with distance.
        for p in &self.particles {
            let proj = self.projector.project(p.displayed, &self.camera, &self.viewport);
            let alpha = (p.brightness * proj.scale).clamp(0.0, 1.0) * 0.6;
            cmds.push(DrawCmd::Circle {
                center: proj.screen,
                radius: (p.radius * proj.scale).max(0.2),
                color: [0.55, 0.7, 0.95, alpha],
            });
        }

        self.compose_center_orb(&mut cmds);

        // Asset orbs, farthest first.
        let identity: Vec<usize>;
        let order: &[usize] = if self.draw_order.len() == self.orbs.len() {
            &self.draw_order
        } else {
            identity = (0..self.orbs.len()).collect();
            &identity
        };
        for &i in order {
            self.compose_asset_orb(&mut cmds, i, center_screen);
        }

        if self.immersive {
            self.compose_chrome(&mut cmds);
        }
        cmds
    }

    fn compose_center_orb(&self, cmds: &mut Vec<DrawCmd>) {
        let proj = self
            .projector
            .project(glam::Vec3::ZERO, &self.camera, &self.viewport);
        let radius = (self.center.radius * proj.scale).max(1.0);
        let pulse = self.center.pulse;

        // Glow rings breathe with the pulse; outer rings fade first.
        for i in 0..CENTER_RING_COUNT {
            let falloff = 1.0 - i as f32 / CENTER_RING_COUNT as f32;
            cmds.push(DrawCmd::Ring {
                center: proj.screen,
                radius: radius + CENTER_RING_SPACING * (i as f32 + 1.0) * proj.scale,
                color: [0.35, 0.75, 0.95, 0.35 * pulse * falloff],
                width: 1.5,
            });
        }
        cmds.push(DrawCmd::Glow {
            center: proj.screen,
            radius: radius * 1.9,
            color: [0.3, 0.65, 0.95, GLOW_ALPHA * (0.6 + 0.4 * pulse)],
        });
        cmds.push(DrawCmd::Circle {
            center: proj.screen,
            radius,
            color: [0.16, 0.4, 0.72, 1.0],
        });
        cmds.push(DrawCmd::Text {
            pos: proj.screen + Vec2::new(0.0, radius + 20.0),
            text: format_value(self.total_value, self.balances_hidden),
            size: 16.0,
            color: [0.92, 0.95, 1.0, 1.0],
            centered: true,
        });
    }

    fn compose_asset_orb(&self, cmds: &mut Vec<DrawCmd>, index: usize, center_screen: Vec2) {
        let orb = &self.orbs[index];
        let proj = self
            .projector
            .project(orb.displayed, &self.camera, &self.viewport);
        let radius = (orb.radius * proj.scale).max(1.0);
        let [r, g, b] = orb.color;
        let selected = index == self.selected;

        cmds.push(DrawCmd::Line {
            from: center_screen,
            to: proj.screen,
            color: [r, g, b, 0.22],
            width: 1.0,
        });
        cmds.push(DrawCmd::Glow {
            center: proj.screen,
            radius: radius * 1.8,
            color: [r, g, b, GLOW_ALPHA],
        });
        cmds.push(DrawCmd::Circle {
            center: proj.screen,
            radius,
            color: [r, g, b, 1.0],
        });

        // Logo when loaded; otherwise the symbol stands in. A pending or
        // failed load never blocks the frame.
        match self.logos.image(&orb.symbol) {
            Some(image) => cmds.push(DrawCmd::Sprite {
                center: proj.screen,
                radius: radius * 0.72,
                image,
            }),
            None => cmds.push(DrawCmd::Text {
                pos: proj.screen,
                text: orb.symbol.chars().take(4).collect(),
                size: (radius * 0.55).max(6.0),
                color: [1.0, 1.0, 1.0, 0.95],
                centered: true,
            }),
        }

        cmds.push(DrawCmd::Ring {
            center: proj.screen,
            radius: radius + 1.5,
            color: if selected {
                [1.0, 1.0, 1.0, 0.9]
            } else {
                [r, g, b, 0.5]
            },
            width: if selected { 2.5 } else { 1.0 },
        });
        cmds.push(DrawCmd::Text {
            pos: proj.screen + Vec2::new(0.0, radius + 14.0),
            text: format_value(orb.value, self.balances_hidden),
            size: 11.0,
            color: [0.85, 0.9, 1.0, 0.9],
            centered: true,
        });
    }

    fn compose_grid(&self, cmds: &mut Vec<DrawCmd>) {
        let w = self.viewport.width;
        let h = self.viewport.height;
        let grid_color = [0.12, 0.35, 0.5, 0.18];
        let step = 80.0;
        let mut x = 0.0;
        while x <= w {
            cmds.push(DrawCmd::Line {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, h),
                color: grid_color,
                width: 1.0,
            });
            x += step;
        }
        let mut y = 0.0;
        while y <= h {
            cmds.push(DrawCmd::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(w, y),
                color: grid_color,
                width: 1.0,
            });
            y += step;
        }
        // Hex frame around the scene center.
        let center = self.viewport.center();
        for &hex_r in &[h * 0.42, h * 0.46] {
            let mut prev = hex_vertex(center, hex_r, 0);
            for i in 1..=6 {
                let next = hex_vertex(center, hex_r, i);
                cmds.push(DrawCmd::Line {
                    from: prev,
                    to: next,
                    color: [0.2, 0.6, 0.8, 0.25],
                    width: 1.0,
                });
                prev = next;
            }
        }
    }

    fn compose_chrome(&self, cmds: &mut Vec<DrawCmd>) {
        let w = self.viewport.width;
        let h = self.viewport.height;
        let accent = [0.3, 0.85, 0.95, 0.8];
        let len = 26.0;
        // Corner brackets.
        for &(cx, cy, sx, sy) in &[
            (12.0, 12.0, 1.0, 1.0),
            (w - 12.0, 12.0, -1.0, 1.0),
            (12.0, h - 12.0, 1.0, -1.0),
            (w - 12.0, h - 12.0, -1.0, -1.0),
        ] {
            let corner = Vec2::new(cx, cy);
            cmds.push(DrawCmd::Line {
                from: corner,
                to: corner + Vec2::new(sx * len, 0.0),
                color: accent,
                width: 2.0,
            });
            cmds.push(DrawCmd::Line {
                from: corner,
                to: corner + Vec2::new(0.0, sy * len),
                color: accent,
                width: 2.0,
            });
        }
        // Sweeping scan line.
        let scan_y = (self.elapsed * 40.0) % h;
        cmds.push(DrawCmd::Line {
            from: Vec2::new(0.0, scan_y),
            to: Vec2::new(w, scan_y),
            color: [0.3, 0.85, 0.95, 0.08],
            width: 2.0,
        });
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(24.0, 30.0),
            text: format!("ORBS {:02}", self.orbs.len()),
            size: 12.0,
            color: accent,
            centered: false,
        });
    }
}

#[inline]
fn hex_vertex(center: Vec2, radius: f32, i: usize) -> Vec2 {
    let a = std::f32::consts::FRAC_PI_3 * i as f32;
    center + Vec2::new(a.cos(), a.sin()) * radius
}

/// Read the frame's clear color off the draw list.
pub fn clear_color(cmds: &[DrawCmd]) -> [f32; 4] {
    cmds.iter()
        .find_map(|c| match c {
            DrawCmd::Clear { color } => Some(*color),
            _ => None,
        })
        .unwrap_or([0.0, 0.0, 0.0, 1.0])
}

/// Flatten a draw list into soft-circle instances for painters that render
/// everything through one instanced pipeline. Lines become dotted runs;
/// sprites and text are left to richer painters.
pub fn flatten_instances(cmds: &[DrawCmd], out: &mut Vec<OrbInstance>) {
    for cmd in cmds {
        match cmd {
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => out.push(OrbInstance {
                center: center.to_array(),
                radius: *radius,
                inner_radius: 0.0,
                color: *color,
                feather: 1.5,
                _pad: [0.0; 3],
            }),
            DrawCmd::Glow {
                center,
                radius,
                color,
            } => out.push(OrbInstance {
                center: center.to_array(),
                radius: *radius,
                inner_radius: 0.0,
                color: *color,
                feather: *radius,
                _pad: [0.0; 3],
            }),
            DrawCmd::Ring {
                center,
                radius,
                color,
                width,
            } => out.push(OrbInstance {
                center: center.to_array(),
                radius: *radius,
                inner_radius: (radius - width).max(0.0),
                color: *color,
                feather: 1.0,
                _pad: [0.0; 3],
            }),
            DrawCmd::Line {
                from,
                to,
                color,
                width,
            } => {
                let span = *to - *from;
                let len = span.length();
                if len <= f32::EPSILON {
                    continue;
                }
                let dots = (len / CONNECTOR_DOT_SPACING).ceil() as usize;
                for d in 0..=dots {
                    let t = d as f32 / dots.max(1) as f32;
                    out.push(OrbInstance {
                        center: (*from + span * t).to_array(),
                        radius: width.max(1.0),
                        inner_radius: 0.0,
                        color: *color,
                        feather: 0.8,
                        _pad: [0.0; 3],
                    });
                }
            }
            DrawCmd::Clear { .. } | DrawCmd::Sprite { .. } | DrawCmd::Text { .. } => {}
        }
    }
}

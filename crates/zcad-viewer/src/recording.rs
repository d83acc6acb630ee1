//! 记录式画笔
//!
//! 不输出图像，只记录收到的路径命令。用于无界面环境下统计绘制结果。

use crate::painter::Painter;
use zcad_kernel::math::Point2;
use zcad_kernel::meta::Color;

/// 一条画笔命令
#[derive(Debug, Clone, PartialEq)]
pub enum PainterCall {
    MoveTo(Point2),
    LineTo(Point2),
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    ArcNegative {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    SetColor(Color),
    SetLineWidth(f64),
    Stroke,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub calls: Vec<PainterCall>,
    scale: f64,
}

impl RecordingPainter {
    pub fn new(scale: f64) -> Self {
        Self {
            calls: Vec::new(),
            scale,
        }
    }

    /// 描边次数，即绘制出的路径数
    pub fn stroke_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PainterCall::Stroke))
            .count()
    }

    pub fn count_arc_negative(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PainterCall::ArcNegative { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Painter for RecordingPainter {
    fn move_to(&mut self, p: &Point2) {
        self.calls.push(PainterCall::MoveTo(*p));
    }

    fn line_to(&mut self, p: &Point2) {
        self.calls.push(PainterCall::LineTo(*p));
    }

    fn arc(&mut self, center: &Point2, radius: f64, start_angle: f64, end_angle: f64) {
        self.calls.push(PainterCall::Arc {
            center: *center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn arc_negative(&mut self, center: &Point2, radius: f64, start_angle: f64, end_angle: f64) {
        self.calls.push(PainterCall::ArcNegative {
            center: *center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn stroke(&mut self) {
        self.calls.push(PainterCall::Stroke);
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn set_color(&mut self, color: Color) {
        self.calls.push(PainterCall::SetColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.calls.push(PainterCall::SetLineWidth(width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::draw_entity;
    use crate::painter::DrawOptions;
    use zcad_kernel::entity::CadEntity;
    use zcad_kernel::geometry::{Circle, Line};
    use zcad_kernel::math::BoundingBox2;

    #[test]
    fn test_stroke_count_one_per_drawn_entity() {
        let area = BoundingBox2::new(Point2::new(-100.0, -100.0), Point2::new(100.0, 100.0));
        let entities = [
            CadEntity::new(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)).unwrap()),
            CadEntity::new(Circle::new(Point2::new(5.0, 5.0), 3.0).unwrap()),
            CadEntity::new(Circle::new(Point2::new(500.0, 500.0), 3.0).unwrap()),
        ];

        let mut painter = RecordingPainter::new(1.0);
        let drawn = entities
            .iter()
            .filter(|e| draw_entity(e, &mut painter, &DrawOptions::default(), &area))
            .count();

        assert_eq!(drawn, 2);
        assert_eq!(painter.stroke_count(), 2);
        painter.clear();
        assert_eq!(painter.stroke_count(), 0);
    }
}

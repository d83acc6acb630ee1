//! ZCAD 命令行工具
//!
//! 加载配置，构建一张示例图纸，执行捕捉、求交与修剪查询并输出日志。

mod config;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

use zcad_kernel::prelude::*;
use zcad_viewer::{draw_entity, draw_snap_indicator, RecordingPainter, Viewport};

use crate::config::AppConfig;

fn create_demo_content(store: &mut EntityStore) -> Result<Vec<EntityId>> {
    let mut ids = Vec::new();

    // 网格线
    for i in 0..5 {
        let x = i as f64 * 50.0;
        let line = Line::new(Point2::new(x, -20.0), Point2::new(x, 220.0))?;
        ids.push(store.insert(CadEntity::new(line)));
    }
    let axis = Line::new(Point2::new(-20.0, 100.0), Point2::new(220.0, 100.0))?;
    ids.push(store.insert(CadEntity::new(axis).with_meta(MetaType::Color(Color::RED))));

    let circle = Circle::new(Point2::new(100.0, 100.0), 60.0)?;
    ids.push(store.insert(CadEntity::new(circle).with_meta(MetaType::Layer("圆".to_string()))));

    let arc = Arc::new(Point2::new(100.0, 100.0), 90.0, 0.0, std::f64::consts::PI, true)?;
    ids.push(store.insert(
        CadEntity::new(arc).with_meta(MetaType::LineWidth(LineWidth(0.5))),
    ));

    let ellipse = Ellipse::new(Point2::new(100.0, 100.0), Vector2::new(80.0, 0.0), 0.5)?;
    ids.push(store.insert(CadEntity::new(ellipse).with_meta(MetaType::Color(Color::CYAN))));

    Ok(ids)
}

fn main() -> Result<()> {
    let config = AppConfig::discover().context("加载配置失败")?;

    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(config.logging.max_level()?)
            .finish(),
    )?;

    info!("Starting ZCAD CLI...");

    let mut store = EntityStore::new();
    let ids = create_demo_content(&mut store)?;
    info!(entities = store.len(), "demo drawing created");

    // 绘制
    let mut viewport = Viewport::new(1400, 900);
    if let Some(bounds) = store.bounds() {
        viewport.zoom_to_fit(&bounds, 10.0);
    }
    let area = viewport.visible_area();
    let options = config.render.draw_options();
    let mut painter = RecordingPainter::new(viewport.zoom);
    let drawn = store
        .iter()
        .filter(|entity| draw_entity(entity, &mut painter, &options, &area))
        .count();
    info!(
        drawn,
        culled = store.len() - drawn,
        paths = painter.stroke_count(),
        commands = painter.calls.len(),
        "rendered drawing"
    );

    // 捕捉
    let cursor = Point2::new(48.0, 103.0);
    let snaps = store.snap_points(&cursor, None, &config.snap);
    for snap in &snaps {
        info!(
            kind = snap.kind.shortcut(),
            x = snap.point.x,
            y = snap.point.y,
            distance = snap.distance,
            "snap candidate"
        );
    }
    if let Some(best) = snaps.first() {
        painter.clear();
        draw_snap_indicator(&mut painter, best, &options);
        debug!(commands = painter.calls.len(), "snap indicator drawn");
    }

    // 求交
    let hits = store.intersections();
    info!(count = hits.len(), "intersections across drawing");

    // 修剪：保留水平轴线在圆左侧的一段
    if let (Some(axis), Some(circle)) = (store.get(ids[5]).cloned(), store.get(ids[6]).cloned()) {
        let pick = Point2::new(0.0, 100.0);
        match axis.accept(&circle, &mut Trim::new(pick)) {
            TrimResult::Trimmed(kind) => {
                let new_id = store.replace(axis.id(), kind)?;
                info!(id = new_id.id, generation = new_id.generation, "axis trimmed");
            }
            TrimResult::Unchanged => info!("axis unchanged"),
        }
    }

    info!("ZCAD CLI finished");
    Ok(())
}

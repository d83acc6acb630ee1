//! 实体存储
//!
//! 以实体的稳定ID（不含代数）为键，按插入顺序保存 `Arc<CadEntity>`。
//! 替换实体时保留原位置并写入新的代数。

use crate::entity::{CadEntity, EntityId, EntityKind};
use crate::error::{GeometryError, Result};
use crate::interaction::intersect;
use crate::math::{points_approx_eq, BoundingBox2, Point2, EPSILON};
use crate::snap::{rank_snap_points, EntityCoordinate, SnapConfig, SnapKind, Snapable};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// 两个实体之间的一个交点
#[derive(Debug, Clone, PartialEq)]
pub struct EntityIntersection {
    pub first: EntityId,
    pub second: EntityId,
    pub point: Point2,
}

/// 实体存储
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: IndexMap<u64, Arc<CadEntity>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加实体，返回其ID
    pub fn insert(&mut self, entity: CadEntity) -> EntityId {
        let id = entity.id();
        debug!(id = id.id, kind = entity.entity_type().name(), "entity inserted");
        self.entities.insert(id.id, Arc::new(entity));
        id
    }

    /// 用新几何替换实体，返回新版本的ID
    pub fn replace(&mut self, id: EntityId, kind: impl Into<EntityKind>) -> Result<EntityId> {
        let slot = self
            .entities
            .get_mut(&id.id)
            .ok_or(GeometryError::EntityNotFound(id.id))?;
        let edited = slot.with_geometry(kind);
        let new_id = edited.id();
        *slot = Arc::new(edited);
        debug!(id = new_id.id, generation = new_id.generation, "entity replaced");
        Ok(new_id)
    }

    /// 删除实体，其余实体保持顺序
    pub fn remove(&mut self, id: EntityId) -> Result<Arc<CadEntity>> {
        let removed = self
            .entities
            .shift_remove(&id.id)
            .ok_or(GeometryError::EntityNotFound(id.id))?;
        debug!(id = id.id, "entity removed");
        Ok(removed)
    }

    /// 按ID获取实体（忽略代数）
    pub fn get(&self, id: EntityId) -> Option<&Arc<CadEntity>> {
        self.entities.get(&id.id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id.id)
    }

    /// 按插入顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CadEntity>> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 所有实体的包围盒
    pub fn bounds(&self) -> Option<BoundingBox2> {
        self.iter()
            .map(|e| e.bounding_box())
            .reduce(|a, b| a.union(&b))
    }

    /// 包围盒与区域相交的实体
    pub fn query_area(&self, area: &BoundingBox2) -> Vec<Arc<CadEntity>> {
        self.iter()
            .filter(|e| e.bounding_box().intersects(area))
            .cloned()
            .collect()
    }

    /// 所有实体两两之间的交点
    ///
    /// 结果按实体插入顺序排列，与线程调度无关。
    pub fn intersections(&self) -> Vec<EntityIntersection> {
        let entities: Vec<Arc<CadEntity>> = self.iter().cloned().collect();
        let result = pairwise_intersections(&entities);
        debug!(entities = entities.len(), found = result.len(), "computed intersections");
        result
    }

    /// 包围盒与区域相交的实体之间、且落在区域内的交点
    pub fn intersections_in(&self, area: &BoundingBox2) -> Vec<EntityIntersection> {
        let entities = self.query_area(area);
        let mut result = pairwise_intersections(&entities);
        result.retain(|hit| area.contains(&hit.point));
        debug!(entities = entities.len(), found = result.len(), "computed local intersections");
        result
    }

    /// 存储范围内的捕捉点
    ///
    /// 合并每个实体的捕捉点、实体间交点，以及（给定参考点时）从参考点出发的垂足，
    /// 再统一排序截断。
    pub fn snap_points(
        &self,
        query: &Point2,
        reference: Option<&Point2>,
        config: &SnapConfig,
    ) -> Vec<EntityCoordinate> {
        let mut points: Vec<EntityCoordinate> = self
            .iter()
            .flat_map(|e| e.snap_points(query, config.min_distance_to_snap, config.max_snap_points))
            .collect();

        if config.intersections {
            let window = BoundingBox2::new(*query, *query).inflate(config.intersection_radius);
            for hit in self.intersections_in(&window) {
                if !points.iter().any(|c| points_approx_eq(&c.point, &hit.point)) {
                    points.push(
                        EntityCoordinate::new(hit.point, SnapKind::Intersection, query)
                            .with_entity(hit.first),
                    );
                }
            }
        }

        if let Some(from) = reference {
            for entity in self.iter() {
                for foot in entity.perpendicular_points(from) {
                    points.push(
                        EntityCoordinate::new(foot, SnapKind::Perpendicular, query)
                            .with_entity(entity.id()),
                    );
                }
            }
        }

        rank_snap_points(points, config.max_snap_points)
    }
}

fn pairwise_intersections(entities: &[Arc<CadEntity>]) -> Vec<EntityIntersection> {
    (0..entities.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = &entities[i];
            entities[i + 1..].iter().flat_map(move |b| {
                if !a.bounding_box().inflate(EPSILON).intersects(&b.bounding_box()) {
                    return Vec::new();
                }
                intersect(a.kind(), b.kind())
                    .into_points()
                    .into_iter()
                    .map(|point| EntityIntersection {
                        first: a.id(),
                        second: b.id(),
                        point,
                    })
                    .collect()
            })
        })
        .collect()
}

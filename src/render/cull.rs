use crate::entity::Entity;
use crate::render::RenderIndex;
use macroquad::math::{Rect, Vec2};
use std::rc::Rc;

/// Extra pixels kept around the view so partly visible images still draw.
const CULL_MARGIN: f32 = 64.0;

/// Screen-space rectangle an entity's image covers.
pub fn draw_rect(entity: &Entity) -> Rect {
    let at = entity.transformed_position();
    let region = entity.image_region();
    Rect::new(at.x, at.y, region.width(), region.height())
}

/// View rectangle from two corners in any order, padded by the cull margin.
pub fn view_rect(view_min: Vec2, view_max: Vec2) -> Rect {
    let min = view_min.min(view_max) - Vec2::splat(CULL_MARGIN);
    let max = view_min.max(view_max) + Vec2::splat(CULL_MARGIN);
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Entities of `index` that overlap the view, in draw order.
pub fn visible<'g>(
    index: &'g RenderIndex,
    view_min: Vec2,
    view_max: Vec2,
) -> impl Iterator<Item = &'g Rc<Entity>> + 'g {
    let view = view_rect(view_min, view_max);
    index
        .iter()
        .filter(move |entity| view.overlaps(&draw_rect(entity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Placement, Tile};
    use crate::tileset::ImageRegion;
    use macroquad::math::vec2;

    fn tile(x: f32, y: f32) -> Rc<Entity> {
        let region = ImageRegion {
            tileset: 0,
            image: 0,
            rect: Rect::new(0.0, 0.0, 64.0, 64.0),
        };
        Rc::new(Entity::Tile(Tile {
            placement: Placement::at_cell(vec2(x, y), region),
        }))
    }

    #[test]
    fn keeps_only_entities_near_the_view() {
        let mut index = RenderIndex::new();
        index.push(0, tile(0.0, 0.0));
        index.push(0, tile(2000.0, 0.0));
        index.push(1, tile(700.0, 500.0));

        let seen: Vec<Vec2> = visible(&index, vec2(800.0, 600.0), vec2(0.0, 0.0))
            .map(|e| e.position())
            .collect();
        assert_eq!(seen, vec![vec2(0.0, 0.0), vec2(700.0, 500.0)]);
    }
}

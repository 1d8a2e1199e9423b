use crate::entity::{
    Building, Cliff, Direction, Entity, Faction, ObjectInfo, ObjectKind, Placement, Stairs,
};
use crate::error::ObjectError;
use crate::properties::Properties;
use crate::registry::OwnedTileset;
use crate::tilemap::MapObject;
use macroquad::math::Vec2;

/// Turns raw map objects into typed entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectFactory;

impl ObjectFactory {
    /// Dispatches on `obj.kind`. Properties are validated before the image is
    /// resolved, so a bad property never triggers a resolution error.
    pub fn build(&self, obj: &MapObject, tileset: OwnedTileset<'_>) -> Result<Entity, ObjectError> {
        let kind: ObjectKind = obj.kind.parse()?;
        let props = Properties::from_list(&obj.properties);

        match kind {
            ObjectKind::Building => {
                let capacity = props.u8("capacity")?;
                let occupancy = props.u8("occupancy")?;
                let captured_by = parse_enum::<Faction>(&props, "captured_by")?.unwrap_or_default();
                let is_spawn = props.bool("is_spawn")?;
                Ok(Entity::Building(Building {
                    placement: place(obj, tileset)?,
                    info: info(obj),
                    capacity,
                    occupancy,
                    captured_by,
                    is_spawn,
                }))
            }
            ObjectKind::Cliff => Ok(Entity::Cliff(Cliff {
                placement: place(obj, tileset)?,
                info: info(obj),
            })),
            ObjectKind::Stairs => {
                let ascend = required_direction(&props, "ascend")?;
                let descend = required_direction(&props, "descend")?;
                Ok(Entity::Stairs(Stairs {
                    placement: place(obj, tileset)?,
                    info: info(obj),
                    ascend,
                    descend,
                }))
            }
        }
    }
}

fn place(obj: &MapObject, tileset: OwnedTileset<'_>) -> Result<Placement, ObjectError> {
    let region = tileset.region(obj.gid)?;
    Ok(Placement::bottom_anchored(Vec2::new(obj.x, obj.y), region))
}

fn info(obj: &MapObject) -> ObjectInfo {
    ObjectInfo {
        object_id: obj.object_id,
        gid: obj.gid,
        name: obj.name.clone(),
        size: Vec2::new(obj.width, obj.height),
    }
}

/// `None` when the property is absent or empty.
fn parse_enum<T: std::str::FromStr>(props: &Properties, name: &str) -> Result<Option<T>, ObjectError> {
    let text = props.string(name)?;
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).map_err(|_| ObjectError::TypeCoercion {
        property: name.to_owned(),
        value: format!("string {text:?}"),
    })
}

fn required_direction(props: &Properties, name: &str) -> Result<Direction, ObjectError> {
    parse_enum(props, name)?.ok_or_else(|| ObjectError::MissingRequiredProperty(name.to_owned()))
}

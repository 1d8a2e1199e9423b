use crate::error::ObjectError;
use crate::tileset::ImageRegion;
use macroquad::math::Vec2;
use std::str::FromStr;

/// Discriminator shared by the renderer and hit-testing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tile,
    Building,
    Cliff,
    Stairs,
}

/// Object kinds that can be authored in an object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Building,
    Cliff,
    Stairs,
}

impl FromStr for ObjectKind {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Building" => Ok(ObjectKind::Building),
            "Cliff" => Ok(ObjectKind::Cliff),
            "Stairs" => Ok(ObjectKind::Stairs),
            other => Err(ObjectError::UnsupportedObjectType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Faction {
    #[default]
    None,
    Blue,
    Green,
    Red,
    Yellow,
}

impl FromStr for Faction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(Faction::None),
            "BLUE" => Ok(Faction::Blue),
            "GREEN" => Ok(Faction::Green),
            "RED" => Ok(Faction::Red),
            "YELLOW" => Ok(Faction::Yellow),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NORTH" => Ok(Direction::North),
            "EAST" => Ok(Direction::East),
            "SOUTH" => Ok(Direction::South),
            "WEST" => Ok(Direction::West),
            _ => Err(()),
        }
    }
}

/// Where an entity sits and what it draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Authored position.
    pub position: Vec2,
    /// Top-left corner the image is drawn at.
    pub draw_position: Vec2,
    pub region: ImageRegion,
}

impl Placement {
    /// Grid tiles draw exactly at their cell.
    pub fn at_cell(position: Vec2, region: ImageRegion) -> Self {
        Placement {
            position,
            draw_position: position,
            region,
        }
    }

    /// The image's bottom edge sits on the authored point.
    pub fn bottom_anchored(position: Vec2, region: ImageRegion) -> Self {
        Placement {
            position,
            draw_position: Vec2::new(position.x, position.y - region.height()),
            region,
        }
    }
}

/// Identity of an object as authored in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub object_id: u32,
    pub gid: u32,
    pub name: String,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub placement: Placement,
    pub info: ObjectInfo,
    pub capacity: u8,
    pub occupancy: u8,
    pub captured_by: Faction,
    pub is_spawn: bool,
}

impl Building {
    /// `occupancy/capacity`, shown on the capture banner of spawn buildings.
    pub fn banner_label(&self) -> Option<String> {
        self.is_spawn
            .then(|| format!("{}/{}", self.occupancy, self.capacity))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cliff {
    pub placement: Placement,
    pub info: ObjectInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stairs {
    pub placement: Placement,
    pub info: ObjectInfo,
    pub ascend: Direction,
    pub descend: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Tile(Tile),
    Building(Building),
    Cliff(Cliff),
    Stairs(Stairs),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Tile(_) => EntityKind::Tile,
            Entity::Building(_) => EntityKind::Building,
            Entity::Cliff(_) => EntityKind::Cliff,
            Entity::Stairs(_) => EntityKind::Stairs,
        }
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Entity::Tile(t) => &t.placement,
            Entity::Building(b) => &b.placement,
            Entity::Cliff(c) => &c.placement,
            Entity::Stairs(s) => &s.placement,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.placement().position
    }

    pub fn transformed_position(&self) -> Vec2 {
        self.placement().draw_position
    }

    pub fn image_region(&self) -> ImageRegion {
        self.placement().region
    }

    /// `None` for grid tiles.
    pub fn info(&self) -> Option<&ObjectInfo> {
        match self {
            Entity::Tile(_) => None,
            Entity::Building(b) => Some(&b.info),
            Entity::Cliff(c) => Some(&c.info),
            Entity::Stairs(s) => Some(&s.info),
        }
    }

    pub fn as_building(&self) -> Option<&Building> {
        match self {
            Entity::Building(b) => Some(b),
            _ => None,
        }
    }
}

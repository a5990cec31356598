//! Collision layers.
//!
//! Every body declares what it is (membership) and what it may touch (filters).
//! Avian only generates a contact when each side's filters include the other's
//! membership, so the table below is the whole interaction matrix.
//!
//! ```text
//!                 Default  Dozer  Gem  Conveyor  Wall  ShopBarrier
//! Dozer part         x             x              x
//! Gem                x       x     x      x       x        x
//! Collector/belt                   x
//! Wall/gate                  x     x
//! Shop barrier                     x
//! ```

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    Dozer,
    Gem,
    Conveyor,
    Wall,
    ShopBarrier,
}

#[inline]
pub fn dozer_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Dozer, [Layer::Default, Layer::Gem, Layer::Wall])
}

#[inline]
pub fn gem_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Gem,
        [
            Layer::Default,
            Layer::Dozer,
            Layer::Gem,
            Layer::Conveyor,
            Layer::Wall,
            Layer::ShopBarrier,
        ],
    )
}

/// Collector pickup zone and conveyor belts: sensors that only see gems.
#[inline]
pub fn conveyor_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Conveyor, [Layer::Gem])
}

#[inline]
pub fn wall_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Wall, [Layer::Dozer, Layer::Gem])
}

/// Fence around the shop: stops gems, lets the dozer through.
#[inline]
pub fn shop_barrier_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::ShopBarrier, [Layer::Gem])
}

/// Shop pads never generate contacts; purchases use centre-point containment.
#[inline]
pub fn shop_pad_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Default, [] as [Layer; 0])
}

#[inline]
pub fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

/// True when avian would let the two bodies interact.
#[inline]
pub fn interacts(a: &CollisionLayers, b: &CollisionLayers) -> bool {
    a.interacts_with(*b)
}

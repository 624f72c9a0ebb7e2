use super::super::entity::ControllerContext;
use super::super::error::SimulationError;
use super::super::parameters::RoadParameterSet;
use super::Controller;

/// Marks an entity as the road. The lane layout lives in the owner's
/// [`RoadParameterSet`], which is also what its `RoadCollider` reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoadController;

impl RoadController {
    /// Creates a road controller.
    pub fn new() -> Self {
        Self
    }
}

impl Controller for RoadController {
    fn simulate(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SimulationError> {
        match ctx.parameter_set::<RoadParameterSet>() {
            Some(_) => Ok(()),
            None => Err(SimulationError::MissingComponent {
                component: "RoadParameterSet",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::colliders::RoadCollider;
    use crate::simulation::entity::Entity;
    use crate::simulation::graph::EntityGraph;

    #[test]
    fn lane_layout_comes_from_the_owner() {
        let mut graph = EntityGraph::new();
        let id = graph.add(
            Entity::new()
                .with_parameter_set(RoadParameterSet::new(4, 3.5))
                .with_collider(RoadCollider::new())
                .with_controller(RoadController::new()),
        );

        assert!(graph.simulate_frame().is_ok());
        let road = graph
            .entity(id)
            .and_then(|entity| entity.parameter_set::<RoadParameterSet>())
            .unwrap();
        assert_eq!(road.left_border(), -7.0);
        assert_eq!(road.right_border(), 7.0);
    }

    #[test]
    fn road_without_layout_faults() {
        let mut graph = EntityGraph::new();
        graph.add(Entity::new().with_controller(RoadController::new()));

        let report = graph.simulate_frame();
        assert_eq!(
            report.fault.map(|fault| fault.error),
            Some(SimulationError::MissingComponent {
                component: "RoadParameterSet"
            })
        );
    }
}

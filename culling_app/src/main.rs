//! Frustum culling demo
//!
//! Builds a small scene hierarchy, runs one frame of the traversal against
//! a perspective camera, and prints the resulting draw order through a
//! console backend.

use scene_engine::foundation::{logging, math::utils};
use scene_engine::prelude::*;
use scene_engine::render::{BackendCall, RecordingBackend};

/// Backend that logs the call stream instead of talking to a GPU
#[derive(Default)]
struct ConsoleRenderer {
    binds: usize,
    draws: usize,
}

impl RenderBackend for ConsoleRenderer {
    fn bind_material(&mut self, material: Option<MaterialId>) {
        self.binds += 1;
        match material {
            Some(id) => log::info!("bind material {}", id.0),
            None => log::info!("bind default material"),
        }
    }

    fn submit(&mut self, renderable: &RenderableObject) {
        self.draws += 1;
        let m = &renderable.world_matrix;
        log::info!(
            "  draw node {:?} at ({:.1}, {:.1}, {:.1})",
            renderable.node,
            m[(0, 3)],
            m[(1, 3)],
            m[(2, 3)]
        );
    }
}

fn build_scene(graph: &mut SceneGraph) {
    let root = graph.create_node("world");

    // Sky dome, always visible behind everything.
    let sky = graph.create_node("sky");
    graph.add_child(root, sky).unwrap();
    graph
        .set_renderable(sky, Some(Renderable::new(MaterialId(0), GroupId::SkyBox)))
        .unwrap();

    // A row of crates marching away from the camera; the far ones fall
    // outside the frustum.
    for i in 0..8_u32 {
        let crate_node = graph.create_node(format!("crate_{i}"));
        graph.add_child(root, crate_node).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let x = (i as f32 - 4.0) * 6.0;
        graph
            .set_translation(crate_node, Vec3::new(x, 0.0, 10.0))
            .unwrap();
        graph
            .set_bound(
                crate_node,
                Some(Bound::aabb(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))),
            )
            .unwrap();
        graph
            .set_renderable(
                crate_node,
                Some(Renderable::new(MaterialId(1 + i % 2), GroupId::Solid)),
            )
            .unwrap();
    }

    // A glass pane in front of the middle crates.
    let pane = graph.create_node("glass pane");
    graph.add_child(root, pane).unwrap();
    graph.set_translation(pane, Vec3::new(0.0, 0.0, 6.0)).unwrap();
    graph
        .set_bound(pane, Some(Bound::sphere(Vec3::zeros(), 2.0)))
        .unwrap();
    graph
        .set_renderable(pane, Some(Renderable::new(MaterialId(9), GroupId::Transparent)))
        .unwrap();

    // HUD marker with no material assigned; lands in the default bucket.
    let hud = graph.create_node("hud");
    graph.add_child(root, hud).unwrap();
    graph
        .set_renderable(hud, Some(Renderable::without_material(GroupId::Overlay)))
        .unwrap();
}

fn main() {
    logging::init();

    let config = SceneConfig::default();
    let mut graph = SceneGraph::with_config(&config);
    build_scene(&mut graph);

    let mut camera = Camera::new(
        Projection::Perspective {
            fov_y: utils::deg_to_rad(60.0),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 50.0,
        },
        CameraMask::MAIN,
    );
    camera.look_at(
        Vec3::new(0.0, 2.0, -5.0),
        Vec3::new(0.0, 0.0, 10.0),
        Vec3::new(0.0, 1.0, 0.0),
    );

    let mut queue = RenderQueue::new();
    queue.clear();
    graph.visit(&camera, &mut queue);

    log::info!(
        "visited {} nodes, queued {} renderables",
        graph.node_count(),
        queue.renderable_count()
    );

    let mut renderer = ConsoleRenderer::default();
    queue.render(&mut renderer);
    log::info!("{} material binds, {} draws", renderer.binds, renderer.draws);

    // The recording backend shows the same order the console renderer saw.
    let mut recorder = RecordingBackend::new();
    queue.render(&mut recorder);
    let submissions = recorder
        .calls
        .iter()
        .filter(|call| matches!(call, BackendCall::Submit(_)))
        .count();
    assert_eq!(submissions, renderer.draws);
}

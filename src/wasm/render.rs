//! SVG scene construction and the animation loop.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Document, Element, SvgElement};

use crate::mesh::{self, Grid, Triangle, FILL_OPACITY};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The mounted background: the live grid, the triangulation, and one
/// `<polygon>` node per triangle. Node order matches triangle order.
pub struct Scene {
    grid: Grid,
    triangles: Vec<Triangle>,
    svg: SvgElement,
    nodes: Vec<Element>,
}

impl Scene {
    /// Build the full-viewport SVG surface, generate the mesh and prepend the
    /// surface as the first child of `<body>`.
    pub fn mount(document: &Document, width: f64, height: f64) -> Result<Scene, JsValue> {
        let mut rng = || js_sys::Math::random();
        let grid = Grid::generate(width, height, &mut rng);
        let triangles = mesh::triangulate(&grid, &mut rng);

        let svg = create_surface(document, width, height)?;
        let mut nodes = Vec::with_capacity(triangles.len());
        for _ in &triangles {
            let poly = document.create_element_ns(Some(SVG_NS), "polygon")?;
            svg.append_child(&poly)?;
            nodes.push(poly);
        }

        let body = document.body().ok_or("no body")?;
        body.prepend_with_node_1(&svg)?;

        Ok(Scene {
            grid,
            triangles,
            svg,
            nodes,
        })
    }

    /// Advance every vertex one frame and rewrite every polygon's geometry
    /// and paint attributes.
    pub fn step(&mut self) -> Result<(), JsValue> {
        self.grid.advance();
        for (triangle, node) in self.triangles.iter().zip(&self.nodes) {
            node.set_attribute("points", &triangle.points_attr(&self.grid))?;
            node.set_attribute("fill", &triangle.fill.to_string())?;
            node.set_attribute("opacity", &FILL_OPACITY.to_string())?;
        }
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn polygon_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> &SvgElement {
        &self.svg
    }
}

fn create_surface(document: &Document, width: f64, height: f64) -> Result<SvgElement, JsValue> {
    let svg: SvgElement = document.create_element_ns(Some(SVG_NS), "svg")?.dyn_into()?;
    svg.set_attribute("width", &width.to_string())?;
    svg.set_attribute("height", &height.to_string())?;

    // Fixed behind all page content, never intercepting input.
    let style = svg.style();
    style.set_property("position", "fixed")?;
    style.set_property("left", "0")?;
    style.set_property("top", "0")?;
    style.set_property("width", "100vw")?;
    style.set_property("height", "100vh")?;
    style.set_property("z-index", "0")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("transition", "background 1s")?;
    style.set_property("background", "linear-gradient(180deg, #0e2a47 0%, #1e5a8a 100%)")?;

    Ok(svg)
}

/// Mount the background and drive it at display refresh rate until the page
/// is torn down. A resize reloads the page instead of recomputing the grid.
pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or("no window")?;
    let document = win.document().ok_or("no document")?;
    let width = win.inner_width()?.as_f64().ok_or("bad innerWidth")?;
    let height = win.inner_height()?.as_f64().ok_or("bad innerHeight")?;

    let mut scene = Scene::mount(&document, width, height)?;
    web_sys::console::log_1(
        &format!(
            "polybg: {}x{} grid, {} polygons",
            scene.grid().rows(),
            scene.grid().cols(),
            scene.polygon_count()
        )
        .into(),
    );

    // Reload on resize; the mesh is regenerated from scratch for the new
    // viewport rather than resized in place.
    let resize_closure = Closure::wrap(Box::new(move || {
        window().unwrap().location().reload().unwrap();
    }) as Box<dyn FnMut()>);
    win.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut()>>>> =
        std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        scene.step().unwrap();

        // schedule next
        window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    window()
        .ok_or("no window")?
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;

    Ok(())
}

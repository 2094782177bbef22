//! Route file and view-settings writers.
//!
//! Both documents are rendered in memory before either file is touched, so
//! a rendering error leaves the previous pair in place.  Each file is
//! replaced whole.  Missing parent directories are created.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;

use crate::vehicle::Scene;
use crate::vtype::VehicleType;
use crate::SceneResult;

/// Colour of highlighted edges in the viewer, RGB 0..=255.
pub const SELECTION_COLOR: &str = "255,0,0";
/// Stroke width of highlighted edges.
pub const SELECTION_WIDTH: &str = "4";
/// Colour of every other edge, RGB 0..=1.
pub const DEFAULT_EDGE_COLOR: &str = "0.7,0.7,0.7";

// ── Route file ────────────────────────────────────────────────────────────────

/// `<routes>`: both vTypes, then every vehicle ascending by departure.
pub fn render_routes(scene: &Scene) -> SceneResult<Vec<u8>> {
    let mut w = document()?;
    w.create_element("routes").write_inner_content(|w| -> quick_xml::Result<()> {
        for vt in VehicleType::all() {
            let attrs = vt.attributes();
            w.create_element("vType")
                .with_attributes(attrs.iter().map(|(k, v)| (*k, v.as_str())))
                .write_empty()?;
        }
        for v in scene.sorted_vehicles() {
            let depart = v.depart_attr();
            let edges = v.edges_attr();
            w.create_element("vehicle")
                .with_attributes([("id", v.id.as_str()), ("type", v.vtype), ("depart", depart.as_str())])
                .write_inner_content(|w| -> quick_xml::Result<()> {
                    w.create_element("route")
                        .with_attribute(("edges", edges.as_str()))
                        .write_empty()?;
                    Ok(())
                })?;
        }
        Ok(())
    })?;
    Ok(finish(w))
}

// ── View settings ─────────────────────────────────────────────────────────────

/// `<viewsettings>` selecting each highlighted edge once, in route order.
pub fn render_settings(scene: &Scene) -> SceneResult<Vec<u8>> {
    let selected = scene.highlight_edges();
    let mut w = document()?;
    w.create_element("viewsettings").write_inner_content(|w| -> quick_xml::Result<()> {
        w.create_element("viewport")
            .with_attributes([("x", "0"), ("y", "0"), ("zoom", "100")])
            .write_empty()?;
        w.create_element("scheme")
            .with_attribute(("name", "real world"))
            .write_inner_content(|w| -> quick_xml::Result<()> {
                w.create_element("edges")
                    .with_attributes([
                        ("laneWidth", "2"),
                        ("showLinkDecals", "true"),
                        ("showRails", "true"),
                        ("hideConnectors", "false"),
                    ])
                    .write_inner_content(|w| -> quick_xml::Result<()> {
                        w.create_element("colorScheme")
                            .with_attributes([("name", "selection"), ("value", DEFAULT_EDGE_COLOR)])
                            .write_empty()?;
                        w.create_element("selections")
                            .with_attribute(("friendlyPos", "true"))
                            .write_inner_content(|w| -> quick_xml::Result<()> {
                                for edge in &selected {
                                    w.create_element("selection")
                                        .with_attributes([
                                            ("id", edge.as_str()),
                                            ("color", SELECTION_COLOR),
                                            ("width", SELECTION_WIDTH),
                                        ])
                                        .write_empty()?;
                                }
                                Ok(())
                            })?;
                        Ok(())
                    })?;
                Ok(())
            })?;
        Ok(())
    })?;
    Ok(finish(w))
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Render both documents, then write the route file and the settings file.
///
/// Both parent directories are created before the first write; the route
/// file is not written unless the settings directory could be prepared.
pub fn write_scene(routes: &Path, settings: &Path, scene: &Scene) -> SceneResult<()> {
    let routes_xml = render_routes(scene)?;
    let settings_xml = render_settings(scene)?;
    create_parent(routes)?;
    create_parent(settings)?;

    fs::write(routes, routes_xml)?;
    log::info!("wrote {} vehicles to {}", scene.vehicle_count(), routes.display());
    fs::write(settings, settings_xml)?;
    log::info!(
        "wrote {} edge selections to {}",
        scene.highlight_edges().len(),
        settings.display()
    );
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn document() -> SceneResult<Writer<Vec<u8>>> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 4);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(w)
}

fn finish(w: Writer<Vec<u8>>) -> Vec<u8> {
    let mut bytes = w.into_inner();
    bytes.push(b'\n');
    bytes
}

fn create_parent(path: &Path) -> SceneResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

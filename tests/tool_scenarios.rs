use std::sync::Arc;

use raster_cell_editor::band::{BandDataType, BandValue};
use raster_cell_editor::config::EditorConfig;
use raster_cell_editor::crs::Crs;
use raster_cell_editor::event::{EditorEvent, EventLog, EventRecorder, HostEvent};
use raster_cell_editor::geometry::{CellCoord, MapPoint, RasterBounds};
use raster_cell_editor::host::MapTool;
use raster_cell_editor::layer::{DataProvider, LayerKind, LayerRef, RasterLayer};
use raster_cell_editor::memory::{MemoryHost, MemoryRaster};
use raster_cell_editor::notify::{NoticeKind, NoticeLevel};
use raster_cell_editor::tools::{CellEditTool, ToolMode};
use raster_cell_editor::widgets::{Rgb, ToolbarAction};

// Tool set up on a host whose only (and active) layer is `raster`
fn setup(raster: MemoryRaster) -> (CellEditTool<MemoryHost>, Arc<MemoryRaster>, EventLog) {
    let raster = raster.into_ref();
    let mut host = MemoryHost::default();
    host.add_layer(raster.clone() as LayerRef);

    let mut tool = CellEditTool::new(host, EditorConfig::default());
    let (recorder, log) = EventRecorder::new();
    tool.event_bus().subscribe(Box::new(recorder));
    tool.setup();
    (tool, raster, log)
}

// Center of cell (col, row) on a unit grid `height` rows high
fn center(col: usize, row: usize, height: usize) -> MapPoint {
    MapPoint::new(col as f64 + 0.5, height as f64 - row as f64 - 0.5)
}

fn draw(tool: &mut CellEditTool<MemoryHost>, values: &[f64], point: MapPoint) {
    tool.handle_event(HostEvent::Action(ToolbarAction::Draw));
    for (i, value) in values.iter().enumerate() {
        tool.handle_event(HostEvent::SpinBoxEdited {
            band: i + 1,
            value: *value,
        });
    }
    tool.handle_event(HostEvent::CanvasClicked(point));
}

#[test]
fn test_undo_and_redo_single_band_edit() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 5, 5, &[BandDataType::Int16]));
    let provider = raster.memory_provider();
    provider.set_value(1, 2, 3, 5.0);

    draw(&mut tool, &[42.0], center(2, 3, 5));
    assert_eq!(provider.value(1, 2, 3), Some(42.0));
    assert!(tool.toolbar().is_enabled(ToolbarAction::Undo));
    assert!(!tool.toolbar().is_enabled(ToolbarAction::Redo));

    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));
    assert_eq!(provider.value(1, 2, 3), Some(5.0));
    assert!(tool.toolbar().is_enabled(ToolbarAction::Redo));

    tool.handle_event(HostEvent::Action(ToolbarAction::Redo));
    assert_eq!(provider.value(1, 2, 3), Some(42.0));

    let history = tool.history().history(&raster.id()).unwrap();
    assert_eq!(history.undo_stack().len(), 1);
    assert_eq!(history.redo_stack().len(), 0);
    assert_eq!(history.undo_stack()[0].cell(), CellCoord::new(2, 3));

    // Nothing went wrong along the way
    assert!(tool.host().notices().is_empty());
    // Provider is left the way it was found
    assert!(!provider.is_editable());
}

// Single band edits on a 2x2 grid; cells repeat so later edits overwrite earlier ones
const EDITS: [(usize, usize, f64); 5] = [
    (0, 0, 10.0),
    (1, 0, 20.0),
    (0, 0, 30.0),
    (1, 1, 40.0),
    (1, 0, 50.0),
];

fn cell_values(raster: &MemoryRaster) -> Vec<Option<f64>> {
    let provider = raster.memory_provider();
    (0..2)
        .flat_map(|row| (0..2).map(move |col| provider.value(1, col, row)))
        .collect()
}

fn drawn(edits: &[(usize, usize, f64)]) -> (CellEditTool<MemoryHost>, Arc<MemoryRaster>) {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]));
    for &(col, row, value) in edits {
        draw(&mut tool, &[value], center(col, row, 2));
    }
    (tool, raster)
}

#[test]
fn test_undo_redo_matches_replaying_remaining_edits() {
    for n in 0..=EDITS.len() {
        for k in 0..=n {
            for m in 0..=k {
                let (mut tool, raster) = drawn(&EDITS[..n]);
                for _ in 0..k {
                    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));
                }
                for _ in 0..m {
                    tool.handle_event(HostEvent::Action(ToolbarAction::Redo));
                }

                let (_, replayed) = drawn(&EDITS[..n - k + m]);
                assert_eq!(cell_values(&raster), cell_values(&replayed), "n={n} k={k} m={m}");
                assert!(tool.host().notices().is_empty(), "n={n} k={k} m={m}");
            }
        }
    }
}

#[test]
fn test_draw_over_empty_float_cell_and_undo() {
    let flow = MemoryRaster::unit_grid("flow", 2, 2, &[BandDataType::Float32]);
    flow.memory_provider().set_value(1, 0, 0, f64::NAN);
    let (mut tool, raster, _) = setup(flow);

    draw(&mut tool, &[3.5], center(0, 0, 2));
    assert_eq!(raster.memory_provider().value(1, 0, 0), Some(3.5));
    assert!(tool.host().notices().is_empty());
    let recorded = tool.history().peek_undo(&raster.id()).unwrap().old_values()[0];
    assert!(matches!(recorded, BandValue::Float(v) if v.is_nan()));

    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));
    assert!(raster.memory_provider().value(1, 0, 0).is_some_and(f64::is_nan));
    assert!(tool.history().has_redo(&raster.id()));
}

#[test]
fn test_empty_integer_cell_without_nodata_is_not_written() {
    let dem = MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]);
    dem.memory_provider().set_value(1, 1, 1, f64::NAN);
    let (mut tool, raster, _) = setup(dem);

    draw(&mut tool, &[7.0], center(1, 1, 2));

    let notice = tool.host().last_notice().unwrap();
    assert_eq!(notice.text, "Band 1 has no value at the clicked cell");
    assert!(!tool.history().has_undo(&raster.id()));
}

#[test]
fn test_click_on_far_edge_edits_last_cell() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]));

    draw(&mut tool, &[6.0], MapPoint::new(2.0, 1.5));
    assert_eq!(raster.memory_provider().value(1, 1, 0), Some(6.0));

    draw(&mut tool, &[8.0], MapPoint::new(0.5, 0.0));
    assert_eq!(raster.memory_provider().value(1, 0, 1), Some(8.0));
    assert!(tool.host().notices().is_empty());
}

#[test]
fn test_renderer_change_reloads_nodata() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 3, 3, &[BandDataType::Int16]));
    raster.memory_provider().fill(1, 12.0);
    assert_eq!(tool.active_raster().unwrap().bands()[0].nodata, None);

    raster.memory_provider().set_source_nodata(1, Some(-1.0));
    tool.handle_event(HostEvent::RendererChanged(raster.id()));
    assert_eq!(tool.active_raster().unwrap().bands()[0].nodata, Some(-1.0));

    tool.handle_event(HostEvent::Action(ToolbarAction::SetNodata));
    tool.handle_event(HostEvent::CanvasClicked(center(2, 2, 3)));
    assert_eq!(raster.memory_provider().value(1, 2, 2), Some(-1.0));
    assert!(tool.host().notices().is_empty());
}

#[test]
fn test_renderer_change_of_other_layer_is_ignored() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 3, 3, &[BandDataType::Int16]));
    raster.memory_provider().set_source_nodata(1, Some(-1.0));

    tool.handle_event(HostEvent::RendererChanged("someone_else".into()));
    assert_eq!(tool.active_raster().unwrap().bands()[0].nodata, None);
}

#[test]
fn test_missing_nodata_blocks_set_nodata_mode() {
    let rgb = MemoryRaster::unit_grid("rgb", 4, 4, &[BandDataType::Byte; 3]);
    rgb.memory_provider().set_source_nodata(1, Some(0.0));
    rgb.memory_provider().set_source_nodata(3, Some(0.0));
    let (mut tool, raster, _) = setup(rgb);
    raster.memory_provider().fill(1, 10.0);

    tool.handle_event(HostEvent::Action(ToolbarAction::SetNodata));
    assert_eq!(tool.mode(), ToolMode::SetNodata);
    tool.handle_event(HostEvent::CanvasClicked(center(1, 1, 4)));

    let notice = tool.host().last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Blocking);
    assert!(notice.text.contains("NODATA value is not defined"));
    assert!(!tool.history().has_undo(&raster.id()));
    assert_eq!(raster.memory_provider().value(1, 1, 1), Some(10.0));
}

#[test]
fn test_set_nodata_mode_writes_nodata_and_undoes() {
    let dem = MemoryRaster::unit_grid("dem", 3, 3, &[BandDataType::Int16]);
    dem.memory_provider().set_source_nodata(1, Some(-9999.0));
    dem.memory_provider().fill(1, 12.0);
    let (mut tool, raster, _) = setup(dem);

    tool.handle_event(HostEvent::Action(ToolbarAction::SetNodata));
    tool.handle_event(HostEvent::CanvasClicked(center(0, 2, 3)));
    assert_eq!(raster.memory_provider().value(1, 0, 2), Some(-9999.0));

    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));
    assert_eq!(raster.memory_provider().value(1, 0, 2), Some(12.0));
}

#[test]
fn test_probe_fills_spin_boxes() {
    let rgb = MemoryRaster::unit_grid("rgb", 4, 4, &[BandDataType::Byte; 3]);
    for (band, value) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
        rgb.memory_provider().set_value(band, 3, 0, value);
    }
    let (mut tool, _, log) = setup(rgb);

    tool.handle_event(HostEvent::CanvasClicked(center(3, 0, 4)));

    let values: Vec<f64> = tool.toolbar().spin_boxes().iter().map(|s| s.value()).collect();
    assert_eq!(values, vec![10.0, 20.0, 30.0]);
    assert_eq!(tool.toolbar().color_button().color, Rgb::new(10, 20, 30));
    assert!(matches!(
        log.last(),
        Some(EditorEvent::CellProbed { cell, .. }) if cell == CellCoord::new(3, 0)
    ));
}

#[test]
fn test_out_of_bounds_click_is_informational() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 5, 5, &[BandDataType::Int16]));

    draw(&mut tool, &[1.0], MapPoint::new(7.0, 2.0));

    let notice = tool.host().last_notice().unwrap();
    assert_eq!(notice.text, "Out of x bounds");
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(!notice.is_blocking());
    assert!(!tool.history().has_undo(&raster.id()));
}

#[test]
fn test_failed_write_releases_editable_state() {
    let rgb = MemoryRaster::unit_grid("rgb", 4, 4, &[BandDataType::Byte; 3]);
    let (mut tool, raster, _) = setup(rgb);
    let provider = raster.memory_provider();
    provider.fail_writes_on(Some(2));

    draw(&mut tool, &[1.0, 2.0, 3.0], center(0, 0, 4));

    assert!(tool.host().last_notice().unwrap().is_blocking());
    assert!(!provider.is_editable());
    assert!(!tool.history().has_undo(&raster.id()));
}

#[test]
fn test_refused_editing_is_reported() {
    let dem = MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Float32]);
    let (mut tool, raster, _) = setup(dem);
    raster.memory_provider().refuse_editable(true);

    draw(&mut tool, &[1.5], center(1, 1, 2));

    let notice = tool.host().last_notice().unwrap();
    assert!(notice.is_blocking());
    assert_eq!(notice.text, "The host can't modify this type of raster");
    assert_eq!(raster.memory_provider().value(1, 1, 1), Some(0.0));
}

#[test]
fn test_transform_failure_is_transient_warning() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 5, 5, &[BandDataType::Int16]));
    tool.host_mut().set_canvas_crs(Crs::new("EPSG:2180"));

    draw(&mut tool, &[3.0], MapPoint::new(1.0, 1.0));

    let notice = tool.host().last_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(!notice.is_blocking());
    assert!(notice.text.contains("EPSG:2180"));
    assert!(!tool.history().has_undo(&raster.id()));
}

#[test]
fn test_define_nodata_validates_input() {
    let rgb = MemoryRaster::unit_grid("rgb", 2, 2, &[BandDataType::Byte; 3]);
    let (mut tool, raster, log) = setup(rgb);

    tool.handle_event(HostEvent::Action(ToolbarAction::DefineNodata));
    let prompt = tool.nodata_prompt().unwrap();
    assert!(prompt.label.contains("Byte"));
    assert_eq!(prompt.initial, "");

    tool.handle_event(HostEvent::NodataSubmitted(Some("lots".to_owned())));
    assert_eq!(tool.host().last_notice().unwrap().text, "Wrong NODATA value!");
    assert!(tool.nodata_prompt().is_none());

    // Out of the Byte range
    tool.handle_event(HostEvent::Action(ToolbarAction::DefineNodata));
    tool.handle_event(HostEvent::NodataSubmitted(Some("300".to_owned())));
    assert_eq!(tool.host().last_notice().unwrap().text, "Wrong NODATA value!");
    assert_eq!(raster.memory_provider().source_nodata(1), None);

    tool.handle_event(HostEvent::Action(ToolbarAction::DefineNodata));
    tool.handle_event(HostEvent::NodataSubmitted(Some("255".to_owned())));
    for band in 1..=3 {
        assert_eq!(raster.memory_provider().source_nodata(band), Some(255.0));
    }
    let notice = tool.host().last_notice().unwrap();
    assert_eq!(notice.text, "Successfully set new NODATA values!");
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(log
        .events()
        .iter()
        .any(|e| matches!(e, EditorEvent::NodataChanged { .. })));
    assert_eq!(tool.active_raster().unwrap().bands()[0].nodata, Some(255.0));
}

#[test]
fn test_cancelled_nodata_prompt_changes_nothing() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int32]));

    tool.handle_event(HostEvent::Action(ToolbarAction::DefineNodata));
    tool.handle_event(HostEvent::NodataSubmitted(None));

    assert!(tool.nodata_prompt().is_none());
    assert!(tool.host().notices().is_empty());
    assert_eq!(raster.memory_provider().source_nodata(1), None);
}

#[test]
fn test_define_nodata_without_raster_warns() {
    let mut tool = CellEditTool::new(MemoryHost::default(), EditorConfig::default());
    tool.setup();

    tool.handle_event(HostEvent::Action(ToolbarAction::DefineNodata));

    let notice = tool.host().last_notice().unwrap();
    assert_eq!(notice.text, "Select a raster layer to define/change NoData value!");
    assert!(!notice.is_blocking());
    assert!(tool.nodata_prompt().is_none());
}

#[test]
fn test_spin_box_commit_redraws_last_cell() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 4, 4, &[BandDataType::Int16]));

    // A probe click only remembers the position
    tool.handle_event(HostEvent::CanvasClicked(center(1, 2, 4)));
    assert!(!tool.history().has_undo(&raster.id()));

    tool.handle_event(HostEvent::SpinBoxCommitted {
        band: 1,
        text: "17".to_owned(),
    });

    assert_eq!(raster.memory_provider().value(1, 1, 2), Some(17.0));
    assert!(tool.history().has_undo(&raster.id()));
    assert_eq!(tool.mode(), ToolMode::Probe);
}

#[test]
fn test_spin_box_commit_without_click_only_sets_value() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 4, 4, &[BandDataType::Int16]));

    tool.handle_event(HostEvent::SpinBoxCommitted {
        band: 1,
        text: "17".to_owned(),
    });

    assert_eq!(tool.toolbar().spin_box(1).unwrap().value(), 17.0);
    assert!(!tool.history().has_undo(&raster.id()));
}

#[test]
fn test_color_picker_sets_rgb_spin_boxes() {
    let rgb = MemoryRaster::unit_grid("rgb", 4, 4, &[BandDataType::Byte; 3]);
    let (mut tool, raster, _) = setup(rgb);
    assert!(tool.toolbar().color_button().enabled);

    tool.handle_event(HostEvent::ColorPicked(Rgb::new(200, 100, 50)));
    let values: Vec<f64> = tool.toolbar().spin_boxes().iter().map(|s| s.value()).collect();
    assert_eq!(values, vec![200.0, 100.0, 50.0]);

    tool.handle_event(HostEvent::Action(ToolbarAction::Draw));
    tool.handle_event(HostEvent::CanvasClicked(center(2, 2, 4)));
    let provider = raster.memory_provider();
    assert_eq!(provider.value(1, 2, 2), Some(200.0));
    assert_eq!(provider.value(2, 2, 2), Some(100.0));
    assert_eq!(provider.value(3, 2, 2), Some(50.0));
}

#[test]
fn test_color_button_needs_three_bands() {
    let (tool, _, _) = setup(MemoryRaster::unit_grid("dem", 4, 4, &[BandDataType::Byte]));
    assert!(!tool.toolbar().color_button().enabled);
}

#[test]
fn test_draw_uses_spin_box_precision() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]));

    tool.handle_event(HostEvent::Action(ToolbarAction::Draw));
    tool.handle_event(HostEvent::SpinBoxEdited {
        band: 1,
        value: 7.9,
    });
    tool.handle_event(HostEvent::CanvasClicked(center(0, 0, 2)));

    // The spin box shows no decimals for integer bands
    assert_eq!(raster.memory_provider().value(1, 0, 0), Some(8.0));
}

#[test]
fn test_unsupported_type_is_rejected() {
    let (tool, _, _) = setup(MemoryRaster::unit_grid("complex", 2, 2, &[BandDataType::CFloat32]));

    assert!(tool.active_raster().is_none());
    let notice = tool.host().last_notice().unwrap();
    assert!(notice.is_blocking());
    assert!(notice.text.contains("can't work with it"));
    assert!(!tool.toolbar().is_enabled(ToolbarAction::Draw));
    assert!(tool.toolbar().is_enabled(ToolbarAction::Help));
}

#[test]
fn test_read_only_raster_is_not_activated() {
    let raster = MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]).read_only();
    let (tool, _, _) = setup(raster);

    assert!(tool.active_raster().is_none());
    assert!(!tool.toolbar().is_enabled(ToolbarAction::Probe));
    assert!(tool.host().last_notice().unwrap().is_blocking());
}

#[test]
fn test_raster_without_crs_is_rejected() {
    let raster = MemoryRaster::new(
        "plain",
        2,
        2,
        RasterBounds::new(0.0, 0.0, 2.0, 2.0),
        &[BandDataType::Int16],
        None,
    );
    let (tool, _, _) = setup(raster);

    assert!(tool.active_raster().is_none());
    let notice = tool.host().last_notice().unwrap();
    assert!(notice.is_blocking());
    assert!(notice.text.contains("coordinate reference system"));
}

#[test]
fn test_non_raster_layer_is_ignored_quietly() {
    let raster =
        MemoryRaster::unit_grid("roads", 2, 2, &[BandDataType::Int16]).with_kind(LayerKind::Vector);
    let (tool, _, _) = setup(raster);

    assert!(tool.active_raster().is_none());
    assert!(tool.host().notices().is_empty());
}

#[test]
fn test_invalid_layer_is_ignored_quietly() {
    let raster = MemoryRaster::unit_grid("broken", 2, 2, &[BandDataType::Int16]).with_valid(false);
    let (tool, _, _) = setup(raster);

    assert!(tool.active_raster().is_none());
    assert!(!tool.toolbar().is_enabled(ToolbarAction::Draw));
    assert!(tool.host().notices().is_empty());
}

#[test]
fn test_changed_band_type_blocks_undo() {
    let (mut tool, raster, _) = setup(MemoryRaster::unit_grid("dem", 3, 3, &[BandDataType::Int16]));
    draw(&mut tool, &[9.0], center(1, 1, 3));

    raster.memory_provider().set_data_type(1, BandDataType::Float32);
    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));

    let notice = tool.host().last_notice().unwrap();
    assert!(notice.is_blocking());
    assert!(notice.text.contains("changed its data type"));
    assert_eq!(raster.memory_provider().value(1, 1, 1), Some(9.0));
    assert!(tool.history().has_undo(&raster.id()));
    assert!(!tool.history().has_redo(&raster.id()));
}

#[test]
fn test_histories_follow_the_active_raster() {
    let first = MemoryRaster::unit_grid("first", 2, 2, &[BandDataType::Int16]).into_ref();
    let second = MemoryRaster::unit_grid("second", 2, 2, &[BandDataType::Int16]).into_ref();
    let mut host = MemoryHost::default();
    host.add_layer(first.clone() as LayerRef);
    host.add_layer(second.clone() as LayerRef);
    host.set_active(Some(0));
    let mut tool = CellEditTool::new(host, EditorConfig::default());
    tool.setup();

    draw(&mut tool, &[4.0], center(0, 0, 2));
    assert!(tool.toolbar().is_enabled(ToolbarAction::Undo));

    tool.host_mut().set_active(Some(1));
    tool.handle_event(HostEvent::ActiveLayerChanged);
    assert!(!tool.toolbar().is_enabled(ToolbarAction::Undo));
    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));
    assert_eq!(first.memory_provider().value(1, 0, 0), Some(4.0));

    tool.host_mut().set_active(Some(0));
    tool.handle_event(HostEvent::ActiveLayerChanged);
    assert!(tool.toolbar().is_enabled(ToolbarAction::Undo));
    tool.handle_event(HostEvent::Action(ToolbarAction::Undo));
    assert_eq!(first.memory_provider().value(1, 0, 0), Some(0.0));
    assert_eq!(second.memory_provider().value(1, 0, 0), Some(0.0));
}

#[test]
fn test_mode_switches_install_map_tool() {
    let (mut tool, _, log) = setup(MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]));

    tool.handle_event(HostEvent::Action(ToolbarAction::Draw));
    assert_eq!(tool.host().map_tool(), &MapTool::Cell(ToolMode::Draw));
    assert!(tool.toolbar().is_checked(ToolbarAction::Draw));
    assert_eq!(
        log.last(),
        Some(EditorEvent::ModeChanged {
            old: ToolMode::Probe,
            new: ToolMode::Draw,
        })
    );

    tool.handle_event(HostEvent::MapToolChanged(MapTool::Other("zoom".to_owned())));
    assert!(!tool.toolbar().is_checked(ToolbarAction::Draw));
}

#[test]
fn test_help_opens_wiki_and_teardown_restores_pan() {
    let (mut tool, _, _) = setup(MemoryRaster::unit_grid("dem", 2, 2, &[BandDataType::Int16]));

    tool.handle_event(HostEvent::Action(ToolbarAction::Help));
    assert_eq!(tool.host().opened_urls(), &[EditorConfig::default().help_url]);

    tool.handle_event(HostEvent::Action(ToolbarAction::Draw));
    tool.teardown();
    assert_eq!(tool.host().map_tool(), &MapTool::Pan);
    assert!(!tool.toolbar().is_registered());
    assert!(tool.history().is_empty());
}

//! Black-box end-to-end scenarios against the public `Engine`/`OpenStream`
//! API: no internal routing-state peeking beyond the `device_refcount`/
//! `global_activation_count` introspection the API itself exposes.

use std::fs;
use std::io::Write;
use std::path::Path;

use audiohal_core::{DeviceBits, Error, NotFoundKind, device_bits};
use audiohal_engine::{Engine, OpenFlags, StreamConfig};
use audiohal_mixer::testing::{LeakTracker, MockMixer};
use audiohal_core::StreamType;

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = fs::File::create(&path).unwrap();
    write!(f, "{contents}").unwrap();
    path
}

fn mixer_with_speaker_and_earpiece() -> MockMixer {
    let mut m = MockMixer::new();
    m.add_bool("Speaker Switch", 1);
    m.add_bool("Earpiece Switch", 1);
    m
}

fn bool_value(mixer: &MockMixer, name: &str) -> i64 {
    let (id, _) = audiohal_core::ControlLookup::lookup_control(mixer, name).unwrap();
    mixer.control(id).unwrap().values[0]
}

#[test]
fn reference_counting_across_two_streams() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <device name="speaker">
            <path name="on"><ctl name="Speaker Switch" val="1"/></path>
            <path name="off"><ctl name="Speaker Switch" val="0"/></path>
          </device>
          <device name="earpiece">
            <path name="on"><ctl name="Earpiece Switch" val="1"/></path>
            <path name="off"><ctl name="Earpiece Switch" val="0"/></path>
          </device>
          <stream type="pcm" dir="out"></stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let engine: Engine<MockMixer> =
        Engine::load(&file, mixer_with_speaker_and_earpiece()).unwrap();

    let speaker = engine.model().device_by_name("speaker").unwrap();
    let leaks = LeakTracker::new();

    let stream_a = engine
        .open_stream(DeviceBits(device_bits::SPEAKER), OpenFlags::default(), StreamConfig {
            stream_type: StreamType::Pcm,
        })
        .unwrap();
    leaks.record_open();
    assert_eq!(engine.device_refcount(speaker), 1);
    assert_eq!(bool_value(&engine.mixer(), "Speaker Switch"), 1);

    let stream_b = engine
        .open_stream(DeviceBits(device_bits::SPEAKER), OpenFlags::default(), StreamConfig {
            stream_type: StreamType::Pcm,
        })
        .unwrap();
    leaks.record_open();
    assert_eq!(engine.device_refcount(speaker), 2);
    assert_eq!(leaks.live_count(), 2);

    stream_a.release().unwrap();
    leaks.record_release();
    assert_eq!(engine.device_refcount(speaker), 1);
    assert_eq!(bool_value(&engine.mixer(), "Speaker Switch"), 1, "still one stream routed, off must not fire");

    stream_b.release().unwrap();
    leaks.record_release();
    assert_eq!(engine.device_refcount(speaker), 0);
    assert_eq!(bool_value(&engine.mixer(), "Speaker Switch"), 0);
    assert_eq!(leaks.live_count(), 0, "every opened stream must have been released");
}

#[test]
fn reroute_disables_old_device_and_enables_new_one() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <device name="speaker">
            <path name="on"><ctl name="Speaker Switch" val="1"/></path>
            <path name="off"><ctl name="Speaker Switch" val="0"/></path>
          </device>
          <device name="earpiece">
            <path name="on"><ctl name="Earpiece Switch" val="1"/></path>
            <path name="off"><ctl name="Earpiece Switch" val="0"/></path>
          </device>
          <stream type="pcm" dir="out"></stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let engine: Engine<MockMixer> =
        Engine::load(&file, mixer_with_speaker_and_earpiece()).unwrap();

    let speaker = engine.model().device_by_name("speaker").unwrap();
    let earpiece = engine.model().device_by_name("earpiece").unwrap();

    let mut stream = engine
        .open_stream(DeviceBits(device_bits::SPEAKER), OpenFlags::default(), StreamConfig {
            stream_type: StreamType::Pcm,
        })
        .unwrap();
    assert_eq!(engine.device_refcount(speaker), 1);

    stream.apply_route(DeviceBits(device_bits::EARPIECE)).unwrap();
    assert_eq!(engine.device_refcount(speaker), 0);
    assert_eq!(engine.device_refcount(earpiece), 1);
    assert_eq!(bool_value(&engine.mixer(), "Speaker Switch"), 0);
    assert_eq!(bool_value(&engine.mixer(), "Earpiece Switch"), 1);

    stream.release().unwrap();
    assert_eq!(engine.device_refcount(earpiece), 0);
}

#[test]
fn hardware_volume_scales_percent_into_native_range() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <stream type="hw" name="voice" card="0">
            <ctl function="leftvol" name="Master Volume" index="0" min="-64" max="50"/>
          </stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let mut mixer = MockMixer::new();
    mixer.add_int("Master Volume", 1, -64, 50);
    let engine: Engine<MockMixer> = Engine::load(&file, mixer).unwrap();

    let mut voice = engine.open_named_stream("voice").unwrap();

    voice.set_hw_volume(0, 0).unwrap();
    let (id, _) = audiohal_core::ControlLookup::lookup_control(&*engine.mixer(), "Master Volume").unwrap();
    assert_eq!(engine.mixer().control(id).unwrap().values[0], -64);

    voice.set_hw_volume(100, 100).unwrap();
    assert_eq!(engine.mixer().control(id).unwrap().values[0], 50);

    voice.set_hw_volume(50, 50).unwrap();
    assert_eq!(engine.mixer().control(id).unwrap().values[0], -64 + (114 * 50) / 100);
}

#[test]
fn codec_probe_selects_among_three_cases() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "probe.txt", "variant_b\n");
    write_file(dir.path(), "variant_a.xml", r#"<audiohal><mixer card="1"></mixer></audiohal>"#);
    write_file(dir.path(), "variant_b.xml", r#"<audiohal><mixer card="2"></mixer></audiohal>"#);
    write_file(dir.path(), "variant_c.xml", r#"<audiohal><mixer card="3"></mixer></audiohal>"#);
    let base = write_file(
        dir.path(),
        "base.xml",
        r#"
            <audiohal>
              <codec_probe file="probe.txt">
                <case name="variant_a" file="variant_a.xml"/>
                <case name="variant_b" file="variant_b.xml"/>
                <case name="variant_c" file="variant_c.xml"/>
              </codec_probe>
              <mixer card="0"></mixer>
            </audiohal>
        "#,
    );

    let engine: Engine<MockMixer> = Engine::load(&base, MockMixer::new()).unwrap();
    assert_eq!(engine.model().card, 2, "probe contents 'variant_b' must select the matching case");
}

#[test]
fn instance_limit_is_enforced_and_released() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <stream type="pcm" dir="out" instances="3"></stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let engine: Engine<MockMixer> = Engine::load(&file, MockMixer::new()).unwrap();

    let config = StreamConfig { stream_type: StreamType::Pcm };
    let s1 = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config).unwrap();
    let _s2 = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config).unwrap();
    let _s3 = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config).unwrap();

    let fourth = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config);
    assert!(matches!(fourth, Err(Error::ResourceLimit)));

    s1.release().unwrap();
    let retried = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config);
    assert!(retried.is_ok(), "releasing a slot must allow a new instance to open");
}

#[test]
fn global_activation_count_tracks_every_open_stream_regardless_of_routing() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <stream type="pcm" dir="out"></stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let engine: Engine<MockMixer> = Engine::load(&file, MockMixer::new()).unwrap();
    let config = StreamConfig { stream_type: StreamType::Pcm };

    assert_eq!(engine.global_activation_count(), 0);

    let s1 = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config).unwrap();
    assert_eq!(
        engine.global_activation_count(),
        1,
        "an unrouted stream must still count toward the global refcount"
    );

    let s2 = engine.open_stream(DeviceBits::NONE, OpenFlags::default(), config).unwrap();
    assert_eq!(
        engine.global_activation_count(),
        2,
        "the global count tracks open streams, not device activations"
    );

    s1.release().unwrap();
    assert_eq!(engine.global_activation_count(), 1);

    s2.release().unwrap();
    assert_eq!(engine.global_activation_count(), 0);
}

#[test]
fn out_of_range_volume_is_rejected_before_any_mixer_write() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <stream type="hw" name="voice" card="0">
            <ctl function="leftvol" name="Master Volume" index="0" min="-64" max="50"/>
          </stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let mut mixer = MockMixer::new();
    mixer.add_int("Master Volume", 1, -64, 50);
    let engine: Engine<MockMixer> = Engine::load(&file, mixer).unwrap();

    let (id, _) = audiohal_core::ControlLookup::lookup_control(&*engine.mixer(), "Master Volume").unwrap();
    let before = engine.mixer().control(id).unwrap().values[0];

    let mut voice = engine.open_named_stream("voice").unwrap();
    let err = voice.set_hw_volume(101, 0).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let after = engine.mixer().control(id).unwrap().values[0];
    assert_eq!(before, after, "a rejected volume call must not touch the mixer");
}

#[test]
fn unknown_use_case_case_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let xml = r#"
        <audiohal>
          <mixer card="0"></mixer>
          <stream type="hw" name="voice" card="0">
            <usecase name="profile">
              <case name="loud"><ctl name="Speaker Switch" val="1"/></case>
            </usecase>
          </stream>
        </audiohal>
    "#;
    let file = write_file(dir.path(), "card0.xml", xml);
    let mut mixer = MockMixer::new();
    mixer.add_bool("Speaker Switch", 1);
    let engine: Engine<MockMixer> = Engine::load(&file, mixer).unwrap();

    let mut voice = engine.open_named_stream("voice").unwrap();
    voice.apply_use_case("profile", "loud").unwrap();
    assert_eq!(bool_value(&engine.mixer(), "Speaker Switch"), 1);

    let err = voice.apply_use_case("profile", "nonexistent").unwrap_err();
    assert!(matches!(err, Error::NotFound(NotFoundKind::UseCase { .. })));
}

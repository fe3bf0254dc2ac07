//! Property tests for the compatibility resolver.

use proptest::prelude::*;

use kinocut_media_registry::{
    available_combinations, compatible_encoders, CachedEncoderList, ElementDescriptor,
    ElementRegistry, MediaCaps, PadDirection, PadTemplate,
};

const MEDIA_TYPES: &[&str] = &[
    "audio/x-vorbis",
    "audio/mpeg",
    "audio/x-flac",
    "video/x-theora",
    "video/x-h264",
    "video/x-vp8",
];

fn pad(direction: PadDirection, media_type: &str) -> PadTemplate {
    PadTemplate {
        name_template: match direction {
            PadDirection::Src => "src".to_string(),
            PadDirection::Sink => "sink".to_string(),
        },
        direction,
        caps: MediaCaps::simple(media_type),
    }
}

fn encoder(name: String, audio: bool, out_type: &str) -> ElementDescriptor {
    let (klass, raw) = if audio {
        ("Codec/Encoder/Audio", "audio/x-raw")
    } else {
        ("Codec/Encoder/Video", "video/x-raw")
    };
    ElementDescriptor {
        name: name.clone(),
        long_name: name,
        klass: klass.to_string(),
        rank: 128,
        pad_templates: vec![pad(PadDirection::Sink, raw), pad(PadDirection::Src, out_type)],
    }
}

fn muxer(name: String, sink_types: &[usize]) -> ElementDescriptor {
    ElementDescriptor {
        name: name.clone(),
        long_name: name,
        klass: "Codec/Muxer".to_string(),
        rank: 128,
        pad_templates: sink_types
            .iter()
            .map(|&i| pad(PadDirection::Sink, MEDIA_TYPES[i % MEDIA_TYPES.len()]))
            .collect(),
    }
}

fn arb_registry() -> impl Strategy<Value = ElementRegistry> {
    let encoders = prop::collection::vec((any::<bool>(), 0usize..MEDIA_TYPES.len()), 0..8);
    let muxers = prop::collection::vec(prop::collection::vec(0usize..MEDIA_TYPES.len(), 0..4), 0..5);
    (encoders, muxers).prop_map(|(encoders, muxers)| {
        let mut registry = ElementRegistry::new();
        for (i, (audio, type_index)) in encoders.into_iter().enumerate() {
            let out_type = if audio {
                MEDIA_TYPES[type_index % 3]
            } else {
                MEDIA_TYPES[3 + type_index % 3]
            };
            registry.add(encoder(format!("enc{i}"), audio, out_type));
        }
        for (i, sink_types) in muxers.into_iter().enumerate() {
            registry.add(muxer(format!("mux{i}"), &sink_types));
        }
        registry
    })
}

proptest! {
    /// Every displayed container has at least one compatible encoder of
    /// each modality, for any registry snapshot.
    #[test]
    fn combinations_always_have_both_modalities(registry in arb_registry()) {
        let mut cache = CachedEncoderList::new();
        let table = available_combinations(&mut cache, &registry);
        for container in &table.containers {
            let audio = table.audio.get(&container.name).expect("audio entry");
            let video = table.video.get(&container.name).expect("video entry");
            prop_assert!(!audio.is_empty());
            prop_assert!(!video.is_empty());
        }
        // Maps carry no muxers beyond the displayed containers.
        prop_assert_eq!(table.audio.len(), table.containers.len());
        prop_assert_eq!(table.video.len(), table.containers.len());
    }

    /// `compatible_encoders` is non-empty exactly when some encoder's
    /// output caps intersect some sink pad of the muxer.
    #[test]
    fn compatibility_matches_pairwise_intersection(registry in arb_registry()) {
        let mut cache = CachedEncoderList::new();
        let encoders = cache.audio_encoders(&registry);
        let muxers = cache.muxers(&registry);
        for muxer in muxers {
            let result = compatible_encoders(&encoders, muxer);
            let expected: Vec<&str> = encoders
                .iter()
                .filter(|e| {
                    e.src_caps().iter().any(|src| {
                        muxer.sink_caps().iter().any(|sink| sink.can_intersect(src))
                    })
                })
                .map(|e| e.name.as_str())
                .collect();
            let got: Vec<&str> = result.iter().map(|e| e.name.as_str()).collect();
            prop_assert_eq!(got, expected);
        }
    }
}

#[test]
fn raw_audio_encoder_reaches_raw_audio_muxer() {
    let mut registry = ElementRegistry::new();
    registry.add(ElementDescriptor {
        name: "rawaenc".to_string(),
        long_name: "Raw audio encoder".to_string(),
        klass: "Codec/Encoder/Audio".to_string(),
        rank: 128,
        pad_templates: vec![pad(PadDirection::Src, "audio/x-raw")],
    });
    registry.add(ElementDescriptor {
        name: "rawmux".to_string(),
        long_name: "Raw muxer".to_string(),
        klass: "Codec/Muxer".to_string(),
        rank: 128,
        pad_templates: vec![pad(PadDirection::Sink, "audio/x-raw")],
    });

    let mut cache = CachedEncoderList::new();
    let encoders = cache.audio_encoders(&registry);
    let muxer = registry.lookup("rawmux").unwrap();
    let compatible = compatible_encoders(&encoders, muxer);
    assert_eq!(compatible.len(), 1);
    assert_eq!(compatible[0].name, "rawaenc");
}

//! Embedded zkVM guest: `GUEST_ELF` and its image ID `GUEST_ID`.

include!(concat!(env!("OUT_DIR"), "/methods.rs"));

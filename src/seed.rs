use log::info;

use crate::error::DirectoryError;
use crate::models::{Category, GroupFields, GroupPatch};
use crate::store::GroupStore;

struct DemoGroup {
    name: &'static str,
    description: &'static str,
    link: &'static str,
    category: Category,
    members_count: u32,
    verified: bool,
}

const DEMO_GROUPS: [DemoGroup; 5] = [
    DemoGroup {
        name: "Rustaceans Francophones",
        description: "Entraide autour de Rust, revues de code et veille sur l'écosystème.",
        link: "https://chat.whatsapp.com/demo-rust",
        category: Category::Tech,
        members_count: 245,
        verified: true,
    },
    DemoGroup {
        name: "Entrepreneurs du Dimanche",
        description: "Projets parallèles, premiers clients et retours d'expérience sans spam.",
        link: "https://chat.whatsapp.com/demo-business",
        category: Category::Business,
        members_count: 890,
        verified: false,
    },
    DemoGroup {
        name: "Trail Île-de-France",
        description: "Sorties course nature le week-end, tous niveaux bienvenus.",
        link: "https://chat.whatsapp.com/demo-trail",
        category: Category::Sports,
        members_count: 120,
        verified: true,
    },
    DemoGroup {
        name: "English Corner",
        description: "Practice English every day with learners and native speakers.",
        link: "https://chat.whatsapp.com/demo-english",
        category: Category::Education,
        members_count: 56,
        verified: false,
    },
    DemoGroup {
        name: "Blagues en Continu",
        description: "Le meilleur de l'humour du web, contenu parfois décalé.",
        link: "https://chat.whatsapp.com/demo-fun",
        category: Category::Fun,
        members_count: 1024,
        verified: true,
    },
];

/// Fills an empty store with sample groups. Returns how many were inserted; a store
/// that already holds groups is left alone.
pub async fn seed_demo_groups<S: GroupStore + ?Sized>(store: &S) -> Result<usize, DirectoryError> {
    if !store.fetch_all().await?.is_empty() {
        info!("Store already holds groups, skipping demo seed");
        return Ok(0);
    }

    for demo in &DEMO_GROUPS {
        let group = store
            .insert(&GroupFields {
                name: demo.name.to_string(),
                description: demo.description.to_string(),
                link: demo.link.to_string(),
                category: demo.category,
                members_count: demo.members_count,
            })
            .await?;
        if demo.verified {
            store.update(&group.id, &GroupPatch::verified(true)).await?;
        }
    }

    info!("Seeded {} demo groups", DEMO_GROUPS.len());
    Ok(DEMO_GROUPS.len())
}

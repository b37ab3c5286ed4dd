//! Static copy and media for the lab page.
//!
//! Collections are rendered in the order they are declared here.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavLink {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResearchArea {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalleryMedia {
    pub src: &'static str,
    pub alt: &'static str,
    pub caption: &'static str,
    pub ken_burns: bool,
    /// Parallax depth factor applied to the image layer.
    pub depth: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Publication {
    pub year: u16,
    pub title: &'static str,
    pub journal: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub email: &'static str,
    pub social_handle: &'static str,
    pub social_url: &'static str,
    pub location: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CallToAction {
    pub href: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabContent {
    pub lab_name: &'static str,
    pub hero_title: &'static str,
    pub hero_text: &'static str,
    pub calls_to_action: &'static [CallToAction],
    pub marquee: &'static [&'static str],
    pub about: &'static str,
    pub research: &'static [ResearchArea],
    pub gallery: &'static [GalleryMedia],
    pub team_intro: &'static str,
    pub team: &'static [TeamMember],
    pub publications: &'static [Publication],
    pub contact: Contact,
}

pub const NAV_LINKS: &[NavLink] = &[
    NavLink { id: "about", label: "About" },
    NavLink { id: "research", label: "Research" },
    NavLink { id: "gallery", label: "Gallery" },
    NavLink { id: "team", label: "Team" },
    NavLink { id: "publications", label: "Publications" },
    NavLink { id: "contact", label: "Contact" },
];

pub const LAB: LabContent = LabContent {
    lab_name: "João Peça Lab",
    hero_title: "Exploring the Neural Circuits of Behavior",
    hero_text: "Our lab investigates how neuronal circuits shape cognition, behavior, \
                and disease, combining molecular tools with systems neuroscience approaches.",
    calls_to_action: &[
        CallToAction { href: "#research", label: "Our research" },
        CallToAction { href: "#contact", label: "Get in touch" },
    ],
    marquee: &[
        "Synaptic plasticity",
        "Circuit maturation",
        "Neurodevelopment",
        "Brain organoids",
        "Disease models",
        "Systems neuroscience",
    ],
    about: "We are a research group at [Your Institution], focusing on the cellular and \
            molecular mechanisms underlying brain function and dysfunction.",
    research: &[
        ResearchArea {
            title: "Synaptic plasticity",
            text: "How synapses form, strengthen and prune as circuits mature.",
        },
        ResearchArea {
            title: "Neurodevelopmental disorders",
            text: "Disease models that connect genetic risk to circuit dysfunction.",
        },
        ResearchArea {
            title: "Organoid models",
            text: "Human brain organoids as a window into early brain function.",
        },
    ],
    gallery: &[
        GalleryMedia {
            src: "media/confocal-neurons.jpg",
            alt: "Confocal image of cortical neurons",
            caption: "Cortical neurons under the confocal",
            ken_burns: true,
            depth: -0.06,
        },
        GalleryMedia {
            src: "media/organoid.jpg",
            alt: "Brain organoid section stained for synaptic markers",
            caption: "Organoid section, week twelve",
            ken_burns: false,
            depth: 0.04,
        },
        GalleryMedia {
            src: "media/rig.jpg",
            alt: "Electrophysiology rig in the lab",
            caption: "Patch-clamp rig",
            ken_burns: false,
            depth: -0.03,
        },
        GalleryMedia {
            src: "media/team-bench.jpg",
            alt: "Lab members working at the bench",
            caption: "Bench day",
            ken_burns: true,
            depth: 0.05,
        },
    ],
    team_intro: "Coming soon: profiles of lab members.",
    team: &[TeamMember {
        name: "João Peça",
        role: "Principal Investigator",
    }],
    publications: &[
        Publication {
            year: 2023,
            title: "Title of paper",
            journal: "Journal Name",
        },
        Publication {
            year: 2024,
            title: "Another title",
            journal: "Journal Name",
        },
        Publication {
            year: 2025,
            title: "Title of paper",
            journal: "Journal Name",
        },
    ],
    contact: Contact {
        email: "joao.peca@university.edu",
        social_handle: "@yourhandle",
        social_url: "https://twitter.com/yourhandle",
        location: "[Your Institution]",
    },
};

pub fn section_ids() -> impl Iterator<Item = &'static str> {
    NAV_LINKS.iter().map(|link| link.id)
}

pub fn copyright_line(year: u32, lab_name: &str) -> String {
    format!("© {year} {lab_name}")
}

pub fn publication_line(publication: &Publication) -> String {
    format!(
        "{} · {} · {}",
        publication.year, publication.title, publication.journal
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publications_keep_declared_order() {
        let years: Vec<_> = LAB.publications.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2023, 2024, 2025]);

        let lines: Vec<_> = LAB.publications.iter().map(publication_line).collect();
        assert_eq!(lines[0], "2023 · Title of paper · Journal Name");
        assert_eq!(lines[2], "2025 · Title of paper · Journal Name");
    }

    #[test]
    fn every_nav_link_has_a_unique_section_id() {
        let mut ids: Vec<_> = section_ids().collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert!(ids.contains(&"publications"));
    }

    #[test]
    fn media_paths_are_relative_to_the_base_path() {
        for media in LAB.gallery {
            assert!(media.src.starts_with("media/"), "{}", media.src);
            assert!(!media.alt.is_empty());
        }
    }

    #[test]
    fn copyright_uses_the_given_year() {
        assert_eq!(copyright_line(2026, LAB.lab_name), "© 2026 João Peça Lab");
    }
}

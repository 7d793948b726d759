//! Built-in onboarding presets and domain suggestions.

use crate::models::CategoryDraft;

/// Category definition shipped with a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetCategory {
    pub name: &'static str,
    pub definition: &'static str,
    /// Comma-separated.
    pub keywords: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingPreset {
    pub id: &'static str,
    pub title: &'static str,
    pub preview_text: &'static str,
    pub categories: &'static [PresetCategory],
    /// The "choose your own" entry; it carries no categories and cannot be
    /// submitted directly.
    pub is_custom_option: bool,
}

impl OnboardingPreset {
    pub fn drafts(&self) -> Vec<CategoryDraft> {
        self.categories
            .iter()
            .map(|category| {
                CategoryDraft::with_details(category.name, category.definition, category.keywords)
            })
            .collect()
    }
}

const PERSONAL_KEYWORDS: &str =
    "personal, life, family, home, health, self, journal, thought, feeling, plan";

pub const CONTENT_CREATOR: OnboardingPreset = OnboardingPreset {
    id: "content_creator",
    title: "Content Creator",
    preview_text: "Content Ideas · Business · Inspiration · Personal",
    categories: &[
        PresetCategory {
            name: "Content Ideas",
            definition: "Ideas for content you want to create, including blog posts, videos, social media, podcasts, newsletters, and other media",
            keywords: "post, video, idea, topic, draft, hook, script, thumbnail, series, viral, trending, episode",
        },
        PresetCategory {
            name: "Business",
            definition: "Business and career-related notes including strategy, revenue, partnerships, clients, and professional development",
            keywords: "client, revenue, strategy, deal, contract, pitch, meeting, sponsor, brand, collab, rate, income",
        },
        PresetCategory {
            name: "Inspiration",
            definition: "Content from others that inspires you, references to revisit, quotes, examples, and creative fuel",
            keywords: "reference, example, inspiration, bookmark, save, love, style, aesthetic, vibe, remix, like",
        },
        PresetCategory {
            name: "Personal",
            definition: "Personal life notes not related to content creation or business",
            keywords: PERSONAL_KEYWORDS,
        },
    ],
    is_custom_option: false,
};

pub const ENTREPRENEUR: OnboardingPreset = OnboardingPreset {
    id: "entrepreneur",
    title: "Entrepreneur",
    preview_text: "Business Ideas · Marketing/Content · Operations · Personal",
    categories: &[
        PresetCategory {
            name: "Business Ideas",
            definition: "New business ideas, startup concepts, product opportunities, and ventures to explore",
            keywords: "idea, startup, opportunity, market, concept, pivot, venture, launch, MVP, validate, problem, solution",
        },
        PresetCategory {
            name: "Marketing/Content",
            definition: "Marketing strategies, content for your business, social media, ads, PR, and customer communications",
            keywords: "marketing, content, post, ad, campaign, social, email, launch, announcement, PR, brand, audience",
        },
        PresetCategory {
            name: "Operations",
            definition: "Day-to-day business operations, processes, tools, team management, and logistics",
            keywords: "process, tool, system, team, hire, vendor, workflow, automation, ops, admin, setup, integrate",
        },
        PresetCategory {
            name: "Personal",
            definition: "Personal life notes not related to your business",
            keywords: PERSONAL_KEYWORDS,
        },
    ],
    is_custom_option: false,
};

pub const LIFE_AND_WORK: OnboardingPreset = OnboardingPreset {
    id: "life_and_work",
    title: "Life + Work",
    preview_text: "Work · Health · Home · Family · Finances · Ideas",
    categories: &[
        PresetCategory {
            name: "Work",
            definition: "Job and career-related notes, projects, meetings, tasks, and professional development",
            keywords: "work, job, meeting, project, boss, team, deadline, task, career, promotion, salary, office",
        },
        PresetCategory {
            name: "Health",
            definition: "Physical and mental health, fitness, medical appointments, nutrition, and wellness",
            keywords: "health, doctor, workout, gym, medication, symptom, sleep, diet, exercise, therapy, appointment, weight",
        },
        PresetCategory {
            name: "Home",
            definition: "Home management, maintenance, repairs, renovation projects, and household tasks",
            keywords: "home, house, repair, fix, clean, renovation, furniture, decor, organize, maintenance, contractor, room",
        },
        PresetCategory {
            name: "Family",
            definition: "Family-related notes, kids, events, activities, and family planning",
            keywords: "family, kids, school, birthday, vacation, event, mom, dad, parent, activity, childcare, relative",
        },
        PresetCategory {
            name: "Finances",
            definition: "Personal finance, budgeting, bills, investments, taxes, and money management",
            keywords: "money, budget, bill, payment, tax, invest, savings, expense, income, account, debt, retirement",
        },
        PresetCategory {
            name: "Ideas",
            definition: "Random ideas, thoughts to capture, things to explore later, and notes to self",
            keywords: "idea, thought, random, someday, maybe, explore, research, remember, note, interesting, look into",
        },
    ],
    is_custom_option: false,
};

pub const CUSTOM_OPTION: OnboardingPreset = OnboardingPreset {
    id: "custom",
    title: "Add custom categories",
    preview_text: "Choose your own categories",
    categories: &[],
    is_custom_option: true,
};

pub const ALL_PRESETS: [OnboardingPreset; 4] =
    [CONTENT_CREATOR, ENTREPRENEUR, LIFE_AND_WORK, CUSTOM_OPTION];

pub fn find_preset(id: &str) -> Option<&'static OnboardingPreset> {
    ALL_PRESETS.iter().find(|preset| preset.id == id.trim())
}

/// Life area with suggested category names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSuggestion {
    pub id: &'static str,
    pub name: &'static str,
    pub suggestions: &'static [&'static str],
}

pub const ALL_DOMAINS: [DomainSuggestion; 6] = [
    DomainSuggestion {
        id: "work",
        name: "Work",
        suggestions: &[
            "Active Projects",
            "Client Work",
            "Meetings",
            "Team Notes",
            "Strategy",
            "Finance",
        ],
    },
    DomainSuggestion {
        id: "home",
        name: "Home",
        suggestions: &[
            "Home Maintenance",
            "Renovations",
            "Decor Ideas",
            "Organization",
            "Shopping Lists",
        ],
    },
    DomainSuggestion {
        id: "family",
        name: "Family",
        suggestions: &[
            "Kids Activities",
            "Family Events",
            "Meal Planning",
            "Health Records",
            "Vacation Planning",
        ],
    },
    DomainSuggestion {
        id: "personal",
        name: "Personal Projects",
        suggestions: &[
            "Side Projects",
            "Hobbies",
            "Learning",
            "Goals",
            "Creative Work",
        ],
    },
    DomainSuggestion {
        id: "ideas",
        name: "Ideas and Writing",
        suggestions: &[
            "Blog Posts",
            "Substack Research",
            "Writing My Book",
            "Tik Tok",
            "Notes to Self",
        ],
    },
    DomainSuggestion {
        id: "health",
        name: "Health",
        suggestions: &[
            "Fitness",
            "Medical",
            "Nutrition",
            "Mental Health",
            "Wellness Goals",
        ],
    },
];

pub fn find_domain(id: &str) -> Option<&'static DomainSuggestion> {
    ALL_DOMAINS.iter().find(|domain| domain.id == id.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_fit_onboarding_bounds() {
        for preset in ALL_PRESETS.iter().filter(|preset| !preset.is_custom_option) {
            let count = preset.categories.len();
            assert!((3..=10).contains(&count), "{} has {count}", preset.id);
        }
        assert!(CUSTOM_OPTION.categories.is_empty());
    }

    #[test]
    fn preset_drafts_keep_definitions() {
        let drafts = find_preset("life_and_work").unwrap().drafts();
        assert_eq!(drafts.len(), 6);
        assert_eq!(drafts[1].name, "Health");
        assert!(drafts[1].definition.starts_with("Physical and mental"));
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find_domain("ideas").unwrap().name, "Ideas and Writing");
        assert!(find_preset("missing").is_none());
    }
}

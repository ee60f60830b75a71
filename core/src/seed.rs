use crate::index::Document;

const OCEAN_FACTS: &[(&str, &str)] = &[
    (
        "Mariana Trench",
        "The Mariana Trench is the deepest oceanic trench on Earth, reaching depths of about 36,000 feet (11,000 meters). Located in the western Pacific Ocean, it's deeper than Mount Everest is tall. The pressure at the bottom is over 1,000 times atmospheric pressure at sea level. Only three people have ever reached the bottom: Jacques Piccard, Don Walsh (1960), and James Cameron (2012).",
    ),
    (
        "Ocean Depth Zones",
        "The average depth of the ocean is about 12,100 feet (3,688 meters). The deepest point is Challenger Deep in the Mariana Trench at 36,000 feet. Ocean zones by depth: Sunlight Zone (0-660ft), Twilight Zone (660-3,300ft), Midnight Zone (3,300-13,000ft), Abyssal Zone (13,000-20,000ft), Hadal Zone (20,000ft+).",
    ),
    (
        "Ocean Exploration",
        "Approximately 80% of the ocean remains unmapped and unexplored. We have better maps of Mars than of our ocean floor. Deep sea exploration is challenging due to extreme pressure, darkness, and cold. Modern tools include ROVs (Remotely Operated Vehicles), AUVs (Autonomous Underwater Vehicles), and deep-sea submersibles.",
    ),
    (
        "Marine Life Diversity",
        "The ocean contains an estimated 2.2 million marine species, with 91% yet to be discovered. Deep sea creatures have unique adaptations like bioluminescence, large eyes, and soft bodies. The deepest fish ever recorded was a snailfish at 26,200 feet in the Mariana Trench. Giant squids can grow up to 43 feet long.",
    ),
    (
        "Ocean and Climate",
        "The ocean absorbs about 30% of human-produced CO2 from the atmosphere. Ocean currents like the Gulf Stream regulate global climate and weather patterns. The ocean has absorbed 90% of the warming from climate change. Rising temperatures cause coral bleaching, sea level rise, and altered marine ecosystems.",
    ),
    (
        "Ocean Coverage",
        "The ocean covers approximately 71% of Earth's surface. The Pacific Ocean is the largest, covering more area than all land combined. If Earth's history were a 24-hour day, the ocean would have appeared around 4am. The ocean holds about 97% of Earth's water.",
    ),
    (
        "Bioluminescence",
        "About 90% of deep sea creatures produce their own light through bioluminescence. This ability serves multiple purposes: attracting prey, deterring predators, and communicating with others. The light is produced through chemical reactions involving luciferin and luciferase. Different species produce different colors, though blue and green are most common.",
    ),
    (
        "Hydrothermal Vents",
        "Hydrothermal vents are underwater geysers found along mid-ocean ridges. Water heated by magma beneath the ocean floor shoots up through cracks, reaching temperatures of 750°F (400°C). These vents support unique ecosystems that don't rely on sunlight, instead using chemosynthesis. Tube worms, giant clams, and specialized bacteria thrive in these extreme environments.",
    ),
    (
        "Ocean Trenches",
        "Ocean trenches are the deepest parts of the ocean, formed where tectonic plates converge. The Mariana Trench is the deepest, but there are others like the Tonga Trench, Philippine Trench, and Puerto Rico Trench. These environments experience crushing pressure, near-freezing temperatures, and complete darkness. Despite these conditions, life exists even at the deepest points.",
    ),
    (
        "Ocean Plastic Pollution",
        "An estimated 8 million metric tons of plastic enter the ocean each year. The Great Pacific Garbage Patch is a massive collection of marine debris in the North Pacific Ocean. Microplastics have been found in the deepest ocean trenches and in marine life at all depths. This pollution affects over 800 marine species through entanglement or ingestion.",
    ),
];

/// The built-in ocean facts the service starts with when no corpus file is given.
pub fn ocean_facts() -> Vec<Document> {
    OCEAN_FACTS.iter().map(|(topic, content)| Document::new(*topic, *content)).collect()
}

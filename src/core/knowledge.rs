use std::collections::{HashMap, HashSet};

use chrono::Datelike;

/// Earliest card year the year resolver will verify.
pub const MIN_CARD_YEAR: i32 = 1970;

const LEAGUE_TEAMS: &[&str] = &[
    // MLB, including franchise names still common on vintage cards
    "Arizona Diamondbacks",
    "Atlanta Braves",
    "Baltimore Orioles",
    "Boston Red Sox",
    "Brooklyn Dodgers",
    "Chicago Cubs",
    "Chicago White Sox",
    "Cincinnati Reds",
    "Cleveland Guardians",
    "Cleveland Indians",
    "Colorado Rockies",
    "Detroit Tigers",
    "Florida Marlins",
    "Houston Astros",
    "Kansas City Royals",
    "Los Angeles Angels",
    "Los Angeles Dodgers",
    "Miami Marlins",
    "Milwaukee Brewers",
    "Minnesota Twins",
    "Montreal Expos",
    "New York Mets",
    "New York Yankees",
    "Oakland Athletics",
    "Philadelphia Phillies",
    "Pittsburgh Pirates",
    "San Diego Padres",
    "San Francisco Giants",
    "Seattle Mariners",
    "St. Louis Cardinals",
    "Tampa Bay Rays",
    "Texas Rangers",
    "Toronto Blue Jays",
    "Washington Nationals",
    // NBA
    "Atlanta Hawks",
    "Boston Celtics",
    "Brooklyn Nets",
    "Charlotte Hornets",
    "Chicago Bulls",
    "Cleveland Cavaliers",
    "Dallas Mavericks",
    "Denver Nuggets",
    "Detroit Pistons",
    "Golden State Warriors",
    "Houston Rockets",
    "Indiana Pacers",
    "Los Angeles Clippers",
    "Los Angeles Lakers",
    "Memphis Grizzlies",
    "Miami Heat",
    "Milwaukee Bucks",
    "Minnesota Timberwolves",
    "New Jersey Nets",
    "New Orleans Pelicans",
    "New York Knicks",
    "Oklahoma City Thunder",
    "Orlando Magic",
    "Philadelphia 76ers",
    "Phoenix Suns",
    "Portland Trail Blazers",
    "Sacramento Kings",
    "San Antonio Spurs",
    "Seattle Supersonics",
    "Toronto Raptors",
    "Utah Jazz",
    "Washington Bullets",
    "Washington Wizards",
    // NFL
    "Arizona Cardinals",
    "Atlanta Falcons",
    "Baltimore Ravens",
    "Buffalo Bills",
    "Carolina Panthers",
    "Chicago Bears",
    "Cincinnati Bengals",
    "Cleveland Browns",
    "Dallas Cowboys",
    "Denver Broncos",
    "Detroit Lions",
    "Green Bay Packers",
    "Houston Oilers",
    "Houston Texans",
    "Indianapolis Colts",
    "Jacksonville Jaguars",
    "Kansas City Chiefs",
    "Las Vegas Raiders",
    "Los Angeles Chargers",
    "Los Angeles Rams",
    "Miami Dolphins",
    "Minnesota Vikings",
    "New England Patriots",
    "New Orleans Saints",
    "New York Giants",
    "New York Jets",
    "Oakland Raiders",
    "Philadelphia Eagles",
    "Pittsburgh Steelers",
    "San Diego Chargers",
    "San Francisco 49ers",
    "Seattle Seahawks",
    "St. Louis Rams",
    "Tampa Bay Buccaneers",
    "Tennessee Titans",
    "Washington Commanders",
    "Washington Redskins",
    // NHL
    "Anaheim Ducks",
    "Arizona Coyotes",
    "Boston Bruins",
    "Buffalo Sabres",
    "Calgary Flames",
    "Carolina Hurricanes",
    "Chicago Blackhawks",
    "Colorado Avalanche",
    "Columbus Blue Jackets",
    "Dallas Stars",
    "Detroit Red Wings",
    "Edmonton Oilers",
    "Florida Panthers",
    "Hartford Whalers",
    "Los Angeles Kings",
    "Minnesota North Stars",
    "Minnesota Wild",
    "Montreal Canadiens",
    "Nashville Predators",
    "New Jersey Devils",
    "New York Islanders",
    "New York Rangers",
    "Ottawa Senators",
    "Philadelphia Flyers",
    "Pittsburgh Penguins",
    "Quebec Nordiques",
    "San Jose Sharks",
    "Seattle Kraken",
    "St. Louis Blues",
    "Tampa Bay Lightning",
    "Toronto Maple Leafs",
    "Vancouver Canucks",
    "Vegas Golden Knights",
    "Washington Capitals",
    "Winnipeg Jets",
];

const CARD_BRANDS: &[&str] = &[
    "Topps",
    "Bowman",
    "Panini",
    "Upper Deck",
    "Fleer",
    "Donruss",
    "Leaf",
    "Score",
    "O-Pee-Chee",
    "Stadium Club",
    "Pinnacle",
    "Skybox",
    "Hoops",
    "Pro Set",
    "Playoff",
    "Press Pass",
    "Prizm",
    "Select",
    "Mosaic",
    "Optic",
    "Chronicles",
    "Heritage",
    "Gallery",
];

const KNOWN_PLAYERS: &[&str] = &[
    "Babe Ruth",
    "Barry Bonds",
    "Barry Sanders",
    "Bobby Orr",
    "Brett Favre",
    "Cal Ripken Jr.",
    "Chipper Jones",
    "Connor McDavid",
    "Dan Marino",
    "Darryl Strawberry",
    "Derek Jeter",
    "Dwight Gooden",
    "Emmitt Smith",
    "Frank Thomas",
    "Gary Carter",
    "Giannis Antetokounmpo",
    "Gordie Howe",
    "Greg Maddux",
    "Hank Aaron",
    "Jackie Robinson",
    "Jerry Rice",
    "Joe Montana",
    "Keith Hernandez",
    "Ken Griffey Jr.",
    "Kevin Durant",
    "Kobe Bryant",
    "Larry Bird",
    "LeBron James",
    "Lou Gehrig",
    "Magic Johnson",
    "Mario Lemieux",
    "Michael Jordan",
    "Mickey Mantle",
    "Mike Trout",
    "Nolan Ryan",
    "Patrick Mahomes",
    "Patrick Roy",
    "Pete Rose",
    "Peyton Manning",
    "Roberto Clemente",
    "Ron Darling",
    "Sandy Koufax",
    "Shaquille O'Neal",
    "Shohei Ohtani",
    "Sidney Crosby",
    "Stephen Curry",
    "Ted Williams",
    "Tim Duncan",
    "Tom Brady",
    "Tom Seaver",
    "Tony Gwynn",
    "Ty Cobb",
    "Walter Payton",
    "Wayne Gretzky",
    "Willie Mays",
];

const POSITION_TITLES: &[&str] = &[
    // baseball
    "Pitcher",
    "Catcher",
    "First Base",
    "Second Base",
    "Third Base",
    "Shortstop",
    "Left Field",
    "Center Field",
    "Right Field",
    "Outfield",
    "Infield",
    "Designated Hitter",
    // football
    "Quarterback",
    "Running Back",
    "Wide Receiver",
    "Tight End",
    "Linebacker",
    "Cornerback",
    "Safety",
    "Defensive End",
    "Defensive Tackle",
    "Offensive Tackle",
    "Fullback",
    "Kicker",
    "Punter",
    // basketball
    "Point Guard",
    "Shooting Guard",
    "Small Forward",
    "Power Forward",
    "Guard",
    "Forward",
    "Center",
    // hockey
    "Goaltender",
    "Goalie",
    "Defenseman",
    "Left Wing",
    "Right Wing",
];

const GRADING_AUTHORITIES: &[&str] = &["PSA", "BGS", "SGC"];

/// Tokens that appear on grading-slab labels but are never part of a player
/// name.
const SLAB_NOISE_WORDS: &[&str] = &[
    "PSA", "BGS", "SGC", "BECKETT", "MINT", "GEM", "MT", "NM", "EX", "VG", "AUTHENTIC", "GRADE",
    "GRADED", "CERT", "CERTIFIED", "POP", "CORNERS", "EDGES", "SURFACE", "CENTERING", "ROOKIE",
    "RC", "CARD", "AUTO", "AUTOGRAPH", "LABEL",
];

/// Phrases that mark a number as a printed score rather than stray digits.
const SCORE_CONTEXT_CUES: &[&str] = &["rating", "graded", "/10", "out of"];

/// Immutable lookup sets shared by every resolver. Injected as a parameter
/// so tests can substitute their own instance.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    teams: HashMap<String, &'static str>,
    players: HashMap<String, &'static str>,
    brands: Vec<(String, &'static str)>,
    positions: Vec<(String, &'static str)>,
    slab_noise: HashSet<&'static str>,
    max_year: i32,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        let teams = LEAGUE_TEAMS
            .iter()
            .map(|name| (name.to_lowercase(), *name))
            .collect();
        let players = KNOWN_PLAYERS
            .iter()
            .map(|name| (name.to_lowercase(), *name))
            .collect();
        // Longest first so the most specific brand/position wins a scan.
        let mut brands: Vec<(String, &'static str)> = CARD_BRANDS
            .iter()
            .map(|name| (name.to_lowercase(), *name))
            .collect();
        brands.sort_by_key(|(lower, _)| std::cmp::Reverse(lower.len()));
        let mut positions: Vec<(String, &'static str)> = POSITION_TITLES
            .iter()
            .map(|name| (name.to_lowercase(), *name))
            .collect();
        positions.sort_by_key(|(lower, _)| std::cmp::Reverse(lower.len()));

        Self {
            teams,
            players,
            brands,
            positions,
            slab_noise: SLAB_NOISE_WORDS.iter().copied().collect(),
            max_year: chrono::Utc::now().year(),
        }
    }

    /// Override the upper year bound; tests use this to stay off the wall
    /// clock.
    pub fn with_max_year(mut self, year: i32) -> Self {
        self.max_year = year;
        self
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        (MIN_CARD_YEAR..=self.max_year).contains(&year)
    }

    pub fn canonical_team(&self, text: &str) -> Option<&'static str> {
        self.teams.get(&text.to_lowercase()).copied()
    }

    pub fn canonical_player(&self, text: &str) -> Option<&'static str> {
        self.players.get(&text.to_lowercase()).copied()
    }

    /// First known brand contained in the text, longest names first.
    pub fn find_brand(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.brands
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))
            .map(|(_, canonical)| *canonical)
    }

    pub fn find_position(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.positions
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))
            .map(|(_, canonical)| *canonical)
    }

    /// Grading authority appearing as a standalone word in the text.
    pub fn find_authority(&self, text: &str) -> Option<&'static str> {
        let upper = text.to_uppercase();
        let words: HashSet<&str> = upper
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        GRADING_AUTHORITIES
            .iter()
            .find(|authority| words.contains(**authority))
            .copied()
    }

    pub fn authorities(&self) -> &'static [&'static str] {
        GRADING_AUTHORITIES
    }

    pub fn is_slab_noise(&self, token: &str) -> bool {
        self.slab_noise.contains(token.to_uppercase().as_str())
    }

    pub fn has_score_cue(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        SCORE_CONTEXT_CUES.iter().any(|cue| lower.contains(cue))
    }
}

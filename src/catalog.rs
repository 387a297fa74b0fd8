//! Catalog Resolver: S-57 object classes and attributes.
//!
//! Numeric object-class (`OBJL`) and attribute (`ATTL`) codes resolve to
//! closed enums generated from the static tables below. A code missing from
//! the tables becomes an explicit `Unknown(code)` variant whose acronym is
//! `unknown(code)`; resolution itself never fails and never records
//! anything. Callers decide when an unknown code deserves a warning.
//!
//! The tables are plain data, so lookups are pure and safe to share between
//! concurrent parses.
//!
//! # Examples
//!
//! ```
//! use s57chart::catalog::{AttributeCode, AttributeType, ObjectClass};
//!
//! let depare = ObjectClass::from_code(42);
//! assert_eq!(depare.acronym(), "DEPARE");
//! assert_eq!(depare.name(), "Depth area");
//! assert_eq!(
//!     depare.required_attributes(),
//!     &[AttributeCode::Drval1, AttributeCode::Drval2]
//! );
//!
//! assert_eq!(AttributeCode::from_code(87).attribute_type(), AttributeType::Float);
//! assert_eq!(ObjectClass::from_code(9999).acronym(), "unknown(9999)");
//! ```

use serde::{Deserialize, Serialize};

/// How an attribute value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// `E`: a single enumerated value
    Enumerated,
    /// `L`: a comma-separated list of enumerated values
    List,
    /// `F`: a floating point number
    Float,
    /// `I`: an integer
    Integer,
    /// `A`: a coded string
    CodedString,
    /// `S`: free text
    FreeText,
}

use AttributeType::{CodedString as A, Enumerated as E, Float as F, FreeText as S, Integer as I, List as L};

crate::catalog_enum! {
    /// S-57 attribute, resolved from an `ATTL` code.
    AttributeCode, "attribute", attribute_type -> AttributeType = AttributeType::FreeText;
    Agency = 1, "AGENCY", "Agency responsible for production", S;
    Bcnshp = 2, "BCNSHP", "Beacon shape", E;
    Buishp = 3, "BUISHP", "Building shape", E;
    Boyshp = 4, "BOYSHP", "Buoy shape", E;
    Burdep = 5, "BURDEP", "Buried depth", F;
    Calsgn = 6, "CALSGN", "Call sign", S;
    Catair = 7, "CATAIR", "Category of airport/airfield", L;
    Catach = 8, "CATACH", "Category of anchorage", L;
    Catbrg = 9, "CATBRG", "Category of bridge", L;
    Catbua = 10, "CATBUA", "Category of built-up area", E;
    Catcbl = 11, "CATCBL", "Category of cable", E;
    Catcan = 12, "CATCAN", "Category of canal", E;
    Catcam = 13, "CATCAM", "Category of cardinal mark", E;
    Catchp = 14, "CATCHP", "Category of checkpoint", E;
    Catcoa = 15, "CATCOA", "Category of coastline", E;
    Catctr = 16, "CATCTR", "Category of control point", E;
    Catcon = 17, "CATCON", "Category of conveyor", E;
    Catcov = 18, "CATCOV", "Category of coverage", E;
    Catcrn = 19, "CATCRN", "Category of crane", E;
    Catdam = 20, "CATDAM", "Category of dam", E;
    Catdis = 21, "CATDIS", "Category of distance mark", E;
    Catdoc = 22, "CATDOC", "Category of dock", E;
    Catdpg = 23, "CATDPG", "Category of dumping ground", L;
    Catfnc = 24, "CATFNC", "Category of fence/wall", E;
    Catfry = 25, "CATFRY", "Category of ferry", E;
    Catfif = 26, "CATFIF", "Category of fishing facility", E;
    Catfog = 27, "CATFOG", "Category of fog signal", E;
    Catfor = 28, "CATFOR", "Category of fortified structure", E;
    Catgat = 29, "CATGAT", "Category of gate", E;
    Cathaf = 30, "CATHAF", "Category of harbour facility", L;
    Cathlk = 31, "CATHLK", "Category of hulk", L;
    Catice = 32, "CATICE", "Category of ice", E;
    Catinb = 33, "CATINB", "Category of installation buoy", E;
    Catlnd = 34, "CATLND", "Category of land region", L;
    Catlmk = 35, "CATLMK", "Category of landmark", L;
    Catlam = 36, "CATLAM", "Category of lateral mark", E;
    Catlit = 37, "CATLIT", "Category of light", L;
    Catmfa = 38, "CATMFA", "Category of marine farm/culture", E;
    Catmpa = 39, "CATMPA", "Category of military practice area", L;
    Catmor = 40, "CATMOR", "Category of mooring/warping facility", E;
    Catnav = 41, "CATNAV", "Category of navigation line", E;
    Catobs = 42, "CATOBS", "Category of obstruction", E;
    Catofp = 43, "CATOFP", "Category of offshore platform", L;
    Catolb = 44, "CATOLB", "Category of oil barrier", E;
    Catple = 45, "CATPLE", "Category of pile", E;
    Catpil = 46, "CATPIL", "Category of pilot boarding place", E;
    Catpip = 47, "CATPIP", "Category of pipeline/pipe", L;
    Catpra = 48, "CATPRA", "Category of production area", E;
    Catpyl = 49, "CATPYL", "Category of pylon", E;
    Catqua = 50, "CATQUA", "Category of quality of data", E;
    Catras = 51, "CATRAS", "Category of radar station", E;
    Catrtb = 52, "CATRTB", "Category of radar transponder beacon", E;
    Catros = 53, "CATROS", "Category of radio station", L;
    Cattrk = 54, "CATTRK", "Category of recommended track", E;
    Catrsc = 55, "CATRSC", "Category of rescue station", L;
    Catrea = 56, "CATREA", "Category of restricted area", L;
    Catrod = 57, "CATROD", "Category of road", E;
    Catrun = 58, "CATRUN", "Category of runway", E;
    Catsea = 59, "CATSEA", "Category of sea area", E;
    Catslc = 60, "CATSLC", "Category of shoreline construction", E;
    Catsit = 61, "CATSIT", "Category of signal station, traffic", L;
    Catsiw = 62, "CATSIW", "Category of signal station, warning", L;
    Catsil = 63, "CATSIL", "Category of silo/tank", E;
    Catslo = 64, "CATSLO", "Category of slope", E;
    Catscf = 65, "CATSCF", "Category of small craft facility", L;
    Catspm = 66, "CATSPM", "Category of special purpose mark", L;
    Cattss = 67, "CATTSS", "Category of Traffic Separation Scheme", E;
    Catveg = 68, "CATVEG", "Category of vegetation", L;
    Catwat = 69, "CATWAT", "Category of water turbulence", E;
    Catwed = 70, "CATWED", "Category of weed/kelp", E;
    Catwrk = 71, "CATWRK", "Category of wreck", E;
    Catzoc = 72, "CATZOC", "Category of zone of confidence data", E;
    Colour = 75, "COLOUR", "Colour", L;
    Colpat = 76, "COLPAT", "Colour pattern", L;
    Comcha = 77, "COMCHA", "Communication channel", A;
    Condtn = 81, "CONDTN", "Condition", E;
    Conrad = 82, "CONRAD", "Conspicuous, radar", E;
    Convis = 83, "CONVIS", "Conspicuous, visually", E;
    Curvel = 84, "CURVEL", "Current velocity", F;
    Datend = 85, "DATEND", "Date end", A;
    Datsta = 86, "DATSTA", "Date start", A;
    Drval1 = 87, "DRVAL1", "Depth range value 1", F;
    Drval2 = 88, "DRVAL2", "Depth range value 2", F;
    Dunits = 89, "DUNITS", "Depth units", E;
    Elevat = 90, "ELEVAT", "Elevation", F;
    Estrng = 91, "ESTRNG", "Estimated range of transmission", F;
    Exclit = 92, "EXCLIT", "Exhibition condition of light", E;
    Expsou = 93, "EXPSOU", "Exposition of sounding", E;
    Functn = 94, "FUNCTN", "Function", L;
    Height = 95, "HEIGHT", "Height", F;
    Hunits = 96, "HUNITS", "Height/length units", E;
    Horacc = 97, "HORACC", "Horizontal accuracy", F;
    Horclr = 98, "HORCLR", "Horizontal clearance", F;
    Horlen = 99, "HORLEN", "Horizontal length", F;
    Horwid = 100, "HORWID", "Horizontal width", F;
    Icefac = 101, "ICEFAC", "Ice factor", F;
    Inform = 102, "INFORM", "Information", S;
    Jrsdtn = 103, "JRSDTN", "Jurisdiction", E;
    Lifcap = 106, "LIFCAP", "Lifting capacity", F;
    Litchr = 107, "LITCHR", "Light characteristic", E;
    Litvis = 108, "LITVIS", "Light visibility", L;
    Marsys = 109, "MARSYS", "Marks navigational - System of", E;
    Mltylt = 110, "MLTYLT", "Multiplicity of lights", I;
    Nation = 111, "NATION", "Nationality", A;
    Natcon = 112, "NATCON", "Nature of construction", L;
    Natsur = 113, "NATSUR", "Nature of surface", L;
    Natqua = 114, "NATQUA", "Nature of surface - qualifying terms", L;
    Nmdate = 115, "NMDATE", "Notice to Mariners date", A;
    Objnam = 116, "OBJNAM", "Object name", S;
    Orient = 117, "ORIENT", "Orientation", F;
    Perend = 118, "PEREND", "Periodic date end", A;
    Persta = 119, "PERSTA", "Periodic date start", A;
    Picrep = 120, "PICREP", "Pictorial representation", S;
    Pildst = 121, "PILDST", "Pilot district", S;
    Prctry = 122, "PRCTRY", "Producing country", A;
    Prodct = 123, "PRODCT", "Product", L;
    Pubref = 124, "PUBREF", "Publication reference", S;
    Quasou = 125, "QUASOU", "Quality of sounding measurement", L;
    Radwal = 126, "RADWAL", "Radar wave length", A;
    Radius = 127, "RADIUS", "Radius", F;
    Recdat = 128, "RECDAT", "Recording date", A;
    Recind = 129, "RECIND", "Recording indication", A;
    Ryrmgv = 130, "RYRMGV", "Reference year for magnetic variation", A;
    Restrn = 131, "RESTRN", "Restriction", L;
    Scamax = 132, "SCAMAX", "Scale maximum", I;
    Scamin = 133, "SCAMIN", "Scale minimum", I;
    Scval1 = 134, "SCVAL1", "Scale value one", I;
    Scval2 = 135, "SCVAL2", "Scale value two", I;
    Sectr1 = 136, "SECTR1", "Sector limit one", F;
    Sectr2 = 137, "SECTR2", "Sector limit two", F;
    Shipam = 138, "SHIPAM", "Shift parameters", A;
    Sigfrq = 139, "SIGFRQ", "Signal frequency", I;
    Siggen = 140, "SIGGEN", "Signal generation", E;
    Siggrp = 141, "SIGGRP", "Signal group", A;
    Sigper = 142, "SIGPER", "Signal period", F;
    Sigseq = 143, "SIGSEQ", "Signal sequence", A;
    Souacc = 144, "SOUACC", "Sounding accuracy", F;
    Sdismx = 145, "SDISMX", "Sounding distance - maximum", I;
    Sdismn = 146, "SDISMN", "Sounding distance - minimum", I;
    Sordat = 147, "SORDAT", "Source date", A;
    Sorind = 148, "SORIND", "Source indication", A;
    Status = 149, "STATUS", "Status", L;
    Surath = 150, "SURATH", "Survey authority", S;
    Surend = 151, "SUREND", "Survey date - end", A;
    Sursta = 152, "SURSTA", "Survey date - start", A;
    Surtyp = 153, "SURTYP", "Survey type", L;
    Tecsou = 156, "TECSOU", "Technique of sounding measurement", L;
    Txtdsc = 158, "TXTDSC", "Textual description", S;
    Timend = 168, "TIMEND", "Time end", A;
    Timsta = 169, "TIMSTA", "Time start", A;
    Topshp = 171, "TOPSHP", "Topmark/daymark shape", E;
    Trafic = 172, "TRAFIC", "Traffic flow", E;
    Valacm = 173, "VALACM", "Value of annual change in magnetic variation", F;
    Valdco = 174, "VALDCO", "Value of depth contour", F;
    Vallma = 175, "VALLMA", "Value of local magnetic anomaly", F;
    Valmag = 176, "VALMAG", "Value of magnetic variation", F;
    Valmxr = 177, "VALMXR", "Value of maximum range", F;
    Valnmr = 178, "VALNMR", "Value of nominal range", F;
    Valsou = 179, "VALSOU", "Value of sounding", F;
    Veracc = 180, "VERACC", "Vertical accuracy", F;
    Verclr = 181, "VERCLR", "Vertical clearance", F;
    Verccl = 182, "VERCCL", "Vertical clearance, closed", F;
    Vercop = 183, "VERCOP", "Vertical clearance, open", F;
    Vercsa = 184, "VERCSA", "Vertical clearance, safe", F;
    Verdat = 185, "VERDAT", "Vertical datum", E;
    Verlen = 186, "VERLEN", "Vertical length", F;
    Watlev = 187, "WATLEV", "Water level effect", E;
    CatTs = 188, "CAT_TS", "Category of tidal stream", E;
    Ninfom = 300, "NINFOM", "Information in national language", S;
    Nobjnm = 301, "NOBJNM", "Object name in national language", S;
    Npldst = 302, "NPLDST", "Pilot district in national language", S;
    Ntxtds = 304, "NTXTDS", "Textual description in national language", S;
    Hordat = 400, "HORDAT", "Horizontal datum", E;
    Posacc = 401, "POSACC", "Positional accuracy", F;
    Quapos = 402, "QUAPOS", "Quality of position", E;
}

use AttributeCode as At;

crate::catalog_enum! {
    /// S-57 object class, resolved from an `OBJL` code.
    ObjectClass, "object class", required_attributes -> &'static [AttributeCode] = &[];
    Admare = 1, "ADMARE", "Administration area (named)", &[];
    Airare = 2, "AIRARE", "Airport/airfield", &[];
    Achbrt = 3, "ACHBRT", "Anchor berth", &[];
    Achare = 4, "ACHARE", "Anchorage area", &[];
    Bcncar = 5, "BCNCAR", "Beacon, cardinal", &[At::Catcam];
    Bcnisd = 6, "BCNISD", "Beacon, isolated danger", &[];
    Bcnlat = 7, "BCNLAT", "Beacon, lateral", &[At::Catlam];
    Bcnsaw = 8, "BCNSAW", "Beacon, safe water", &[];
    Bcnspp = 9, "BCNSPP", "Beacon, special purpose/general", &[];
    Berths = 10, "BERTHS", "Berth", &[];
    Bridge = 11, "BRIDGE", "Bridge", &[];
    Buisgl = 12, "BUISGL", "Building, single", &[];
    Buaare = 13, "BUAARE", "Built-up area", &[];
    Boycar = 14, "BOYCAR", "Buoy, cardinal", &[At::Catcam];
    Boyinb = 15, "BOYINB", "Buoy, installation", &[];
    Boyisd = 16, "BOYISD", "Buoy, isolated danger", &[];
    Boylat = 17, "BOYLAT", "Buoy, lateral", &[At::Catlam];
    Boysaw = 18, "BOYSAW", "Buoy, safe water", &[];
    Boyspp = 19, "BOYSPP", "Buoy, special purpose/general", &[];
    Cblare = 20, "CBLARE", "Cable area", &[];
    Cblohd = 21, "CBLOHD", "Cable, overhead", &[];
    Cblsub = 22, "CBLSUB", "Cable, submarine", &[];
    Canals = 23, "CANALS", "Canal", &[];
    Ctsare = 25, "CTSARE", "Cargo transshipment area", &[];
    Causwy = 26, "CAUSWY", "Causeway", &[];
    Ctnare = 27, "CTNARE", "Caution area", &[];
    Chkpnt = 28, "CHKPNT", "Checkpoint", &[];
    Cgusta = 29, "CGUSTA", "Coastguard station", &[];
    Coalne = 30, "COALNE", "Coastline", &[];
    Conzne = 31, "CONZNE", "Contiguous zone", &[];
    Cosare = 32, "COSARE", "Continental shelf area", &[];
    Ctrpnt = 33, "CTRPNT", "Control point", &[];
    Convyr = 34, "CONVYR", "Conveyor", &[];
    Cranes = 35, "CRANES", "Crane", &[];
    Curent = 36, "CURENT", "Current - non-gravitational", &[];
    Cuszne = 37, "CUSZNE", "Custom zone", &[];
    Damcon = 38, "DAMCON", "Dam", &[];
    Daymar = 39, "DAYMAR", "Daymark", &[];
    Dwrtcl = 40, "DWRTCL", "Deep water route centerline", &[];
    Dwrtpt = 41, "DWRTPT", "Deep water route part", &[];
    Depare = 42, "DEPARE", "Depth area", &[At::Drval1, At::Drval2];
    Depcnt = 43, "DEPCNT", "Depth contour", &[At::Valdco];
    Dismar = 44, "DISMAR", "Distance mark", &[];
    Docare = 45, "DOCARE", "Dock area", &[];
    Drgare = 46, "DRGARE", "Dredged area", &[At::Drval1];
    Drydoc = 47, "DRYDOC", "Dry dock", &[];
    Dmpgrd = 48, "DMPGRD", "Dumping ground", &[];
    Dykcon = 49, "DYKCON", "Dyke", &[];
    Exezne = 50, "EXEZNE", "Exclusive economic zone", &[];
    Fairwy = 51, "FAIRWY", "Fairway", &[];
    Fnclne = 52, "FNCLNE", "Fence/wall", &[];
    Feryrt = 53, "FERYRT", "Ferry route", &[];
    Fshzne = 54, "FSHZNE", "Fishery zone", &[];
    Fshfac = 55, "FSHFAC", "Fishing facility", &[];
    Fshgrd = 56, "FSHGRD", "Fishing ground", &[];
    Flodoc = 57, "FLODOC", "Floating dock", &[];
    Fogsig = 58, "FOGSIG", "Fog signal", &[];
    Forstc = 59, "FORSTC", "Fortified structure", &[];
    Frpare = 60, "FRPARE", "Free port area", &[];
    Gatcon = 61, "GATCON", "Gate", &[];
    Gridrn = 62, "GRIDRN", "Gridiron", &[];
    Hrbare = 63, "HRBARE", "Harbour area (administrative)", &[];
    Hrbfac = 64, "HRBFAC", "Harbour facility", &[];
    Hulkes = 65, "HULKES", "Hulk", &[];
    Iceare = 66, "ICEARE", "Ice area", &[];
    Icnare = 67, "ICNARE", "Incineration area", &[];
    Istzne = 68, "ISTZNE", "Inshore traffic zone", &[];
    Lakare = 69, "LAKARE", "Lake", &[];
    Lndare = 71, "LNDARE", "Land area", &[];
    Lndelv = 72, "LNDELV", "Land elevation", &[];
    Lndrgn = 73, "LNDRGN", "Land region", &[];
    Lndmrk = 74, "LNDMRK", "Landmark", &[];
    Lights = 75, "LIGHTS", "Light", &[At::Colour];
    Litflt = 76, "LITFLT", "Light float", &[];
    Litves = 77, "LITVES", "Light vessel", &[];
    Locmag = 78, "LOCMAG", "Local magnetic anomaly", &[];
    Lokbsn = 79, "LOKBSN", "Lock basin", &[];
    Logpon = 80, "LOGPON", "Log pond", &[];
    Magvar = 81, "MAGVAR", "Magnetic variation", &[];
    Marcul = 82, "MARCUL", "Marine farm/culture", &[];
    Mipare = 83, "MIPARE", "Military practice area", &[];
    Morfac = 84, "MORFAC", "Mooring/warping facility", &[];
    Navlne = 85, "NAVLNE", "Navigation line", &[];
    Obstrn = 86, "OBSTRN", "Obstruction", &[];
    Ofsplf = 87, "OFSPLF", "Offshore platform", &[];
    Ospare = 88, "OSPARE", "Offshore production area", &[];
    Oilbar = 89, "OILBAR", "Oil barrier", &[];
    Pilpnt = 90, "PILPNT", "Pile", &[];
    Pilbop = 91, "PILBOP", "Pilot boarding place", &[];
    Pipare = 92, "PIPARE", "Pipeline area", &[];
    Pipohd = 93, "PIPOHD", "Pipeline, overhead", &[];
    Pipsol = 94, "PIPSOL", "Pipeline, submarine/on land", &[];
    Ponton = 95, "PONTON", "Pontoon", &[];
    Prcare = 96, "PRCARE", "Precautionary area", &[];
    Prdare = 97, "PRDARE", "Production/storage area", &[];
    Pylons = 98, "PYLONS", "Pylon/bridge support", &[];
    Radlne = 99, "RADLNE", "Radar line", &[];
    Radrng = 100, "RADRNG", "Radar range", &[];
    Radrfl = 101, "RADRFL", "Radar reflector", &[];
    Radsta = 102, "RADSTA", "Radar station", &[];
    Rtpbcn = 103, "RTPBCN", "Radar transponder beacon", &[];
    Rdocal = 104, "RDOCAL", "Radio calling-in point", &[];
    Rdosta = 105, "RDOSTA", "Radio station", &[];
    Railwy = 106, "RAILWY", "Railway", &[];
    Rapids = 107, "RAPIDS", "Rapids", &[];
    Rcrtcl = 108, "RCRTCL", "Recommended route centerline", &[];
    Rectrc = 109, "RECTRC", "Recommended track", &[];
    Rctlpt = 110, "RCTLPT", "Recommended traffic lane part", &[];
    Rscsta = 111, "RSCSTA", "Rescue station", &[];
    Resare = 112, "RESARE", "Restricted area", &[];
    Retrfl = 113, "RETRFL", "Retro-reflector", &[];
    Rivers = 114, "RIVERS", "River", &[];
    Roadwy = 116, "ROADWY", "Road", &[];
    Runway = 117, "RUNWAY", "Runway", &[];
    Sndwav = 118, "SNDWAV", "Sand waves", &[];
    Seaare = 119, "SEAARE", "Sea area/named water area", &[];
    Splare = 120, "SPLARE", "Sea-plane landing area", &[];
    Sbdare = 121, "SBDARE", "Seabed area", &[];
    Slcons = 122, "SLCONS", "Shoreline construction", &[];
    Sistat = 123, "SISTAT", "Signal station, traffic", &[];
    Sistaw = 124, "SISTAW", "Signal station, warning", &[];
    Siltnk = 125, "SILTNK", "Silo/tank", &[];
    Slotop = 126, "SLOTOP", "Slope topline", &[];
    Slogrd = 127, "SLOGRD", "Sloping ground", &[];
    Smcfac = 128, "SMCFAC", "Small craft facility", &[];
    Soundg = 129, "SOUNDG", "Sounding", &[];
    Spring = 130, "SPRING", "Spring", &[];
    Stslne = 132, "STSLNE", "Straight territorial sea baseline", &[];
    Subtln = 133, "SUBTLN", "Submarine transit lane", &[];
    Swpare = 134, "SWPARE", "Swept area", &[];
    Tesare = 135, "TESARE", "Territorial sea area", &[];
    Tidewy = 143, "TIDEWY", "Tideway", &[];
    Topmar = 144, "TOPMAR", "Top mark", &[];
    Tselne = 145, "TSELNE", "Traffic separation line", &[];
    Tssbnd = 146, "TSSBND", "Traffic separation scheme boundary", &[];
    Tsscrs = 147, "TSSCRS", "Traffic separation scheme crossing", &[];
    Tsslpt = 148, "TSSLPT", "Traffic separation scheme lane part", &[];
    Tssron = 149, "TSSRON", "Traffic separation scheme roundabout", &[];
    Tsezne = 150, "TSEZNE", "Traffic separation zone", &[];
    Tunnel = 151, "TUNNEL", "Tunnel", &[];
    Twrtpt = 152, "TWRTPT", "Two-way route part", &[];
    Uwtroc = 153, "UWTROC", "Underwater/awash rock", &[];
    Unsare = 154, "UNSARE", "Unsurveyed area", &[];
    Vegatn = 155, "VEGATN", "Vegetation", &[];
    Wattur = 156, "WATTUR", "Water turbulence", &[];
    Watfal = 157, "WATFAL", "Waterfall", &[];
    Wedklp = 158, "WEDKLP", "Weed/kelp", &[];
    Wrecks = 159, "WRECKS", "Wreck", &[];
    MAccy = 300, "M_ACCY", "Accuracy of data", &[];
    MCscl = 301, "M_CSCL", "Compilation scale of data", &[];
    MCovr = 302, "M_COVR", "Coverage", &[At::Catcov];
    MHdat = 303, "M_HDAT", "Horizontal datum of data", &[];
    MNpub = 305, "M_NPUB", "Nautical publication information", &[];
    MNsys = 306, "M_NSYS", "Navigational system of marks", &[];
    MProd = 307, "M_PROD", "Production information", &[];
    MQual = 308, "M_QUAL", "Quality of data", &[At::Catzoc];
    MSdat = 309, "M_SDAT", "Sounding datum", &[];
    MSrel = 310, "M_SREL", "Survey reliability", &[];
    MUnit = 311, "M_UNIT", "Units of measurement of data", &[];
    MVdat = 312, "M_VDAT", "Vertical datum of data", &[];
    CAggr = 400, "C_AGGR", "Aggregation", &[];
    CAsso = 401, "C_ASSO", "Association", &[];
    CStac = 402, "C_STAC", "Stacked on/stacked under", &[];
}

impl AttributeCode {
    /// Whether the value is a depth scaled by the sounding multiplication factor.
    #[must_use]
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            AttributeCode::Valsou | AttributeCode::Drval1 | AttributeCode::Drval2 | AttributeCode::Valdco
        )
    }

    /// Whether the value is searched by free-text feature queries.
    #[must_use]
    pub fn is_name(self) -> bool {
        matches!(
            self,
            AttributeCode::Objnam | AttributeCode::Nobjnm | AttributeCode::Inform | AttributeCode::Ninfom
        )
    }
}

impl ObjectClass {
    /// Whether the class is chart metadata (`M_` classes) rather than a charted object.
    #[must_use]
    pub fn is_meta(self) -> bool {
        (300..400).contains(&self.code())
    }

    /// Whether the class is a collection object (`C_` classes).
    #[must_use]
    pub fn is_collection(self) -> bool {
        (400..500).contains(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_sorted() {
        let codes: Vec<u16> = ObjectClass::ALL.iter().map(|c| c.code()).collect();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
        let codes: Vec<u16> = AttributeCode::ALL.iter().map(|c| c.code()).collect();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_round_trip_every_entry() {
        for class in ObjectClass::ALL {
            assert_eq!(ObjectClass::from_code(class.code()), *class);
            assert_eq!(ObjectClass::from_acronym(&class.acronym()), Some(*class));
        }
        for attr in AttributeCode::ALL {
            assert_eq!(AttributeCode::from_acronym(&attr.acronym()), Some(*attr));
        }
    }

    #[test]
    fn test_depth_attributes() {
        assert!(AttributeCode::from_code(179).is_depth());
        assert!(AttributeCode::from_code(174).is_depth());
        assert!(!AttributeCode::Objnam.is_depth());
        assert_eq!(AttributeCode::Valsou.attribute_type(), AttributeType::Float);
        assert_eq!(AttributeCode::Colour.attribute_type(), AttributeType::List);
    }

    #[test]
    fn test_unknown_codes() {
        let unknown = AttributeCode::from_code(9000);
        assert_eq!(unknown.acronym(), "unknown(9000)");
        assert_eq!(unknown.attribute_type(), AttributeType::FreeText);
        assert!(ObjectClass::from_code(1).is_known());
        assert!(ObjectClass::from_code(24).required_attributes().is_empty());
    }

    #[test]
    fn test_serialize_as_acronym() {
        let json = serde_json::to_string(&ObjectClass::Soundg).unwrap();
        assert_eq!(json, "\"SOUNDG\"");
    }

    #[test]
    fn test_class_groups() {
        assert!(ObjectClass::MCovr.is_meta());
        assert!(ObjectClass::CAggr.is_collection());
        assert!(!ObjectClass::Depare.is_meta());
    }
}

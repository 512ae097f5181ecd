//! Reference fields of a three-period Halbach cassette computed with Radia.
//!
//! Each row holds (bx, by, bz) [T] at one longitudinal position of the
//! sampling line used by the corresponding test.

use idkit::{
    geometry::{
        Dim3::{X, Y, Z},
        Matrix3, Point3, Vec3,
    },
    magnet::{block::Block, cassette::HalbachCassette, fmg},
};

/// Longitudinal positions `0, 0.05, ...` of the reference samples.
pub fn sample_positions(n_samples: usize) -> Vec<fmg> {
    (0..n_samples).map(|idx| 0.05 * (idx as fmg)).collect()
}

/// Builds a cassette with three periods of vertically magnetized blocks
/// rotated by a quarter turn about the x-axis from block to block.
pub fn reference_cassette(
    dimension: Vec3<fmg>,
    first_block_position: Point3<fmg>,
) -> HalbachCassette {
    let block = Block::new(Vec3::new(0.0, 1.0, 0.0), dimension, Point3::origin()).unwrap();
    let mut cassette = HalbachCassette::new(&block, Matrix3::rotx90p(), 3, 0.0).unwrap();
    cassette.set_first_block_position(first_block_position);
    cassette
}

/// Asserts that the field along the line `(x, y, z)` matches the reference rows.
pub fn assert_field_matches_reference(
    cassette: &HalbachCassette,
    x: fmg,
    y: fmg,
    reference: &[[fmg; 3]],
    epsilon: fmg,
) {
    for (&z, expected) in sample_positions(reference.len()).iter().zip(reference) {
        let field = cassette.field_at(&Point3::new(x, y, z));
        for (dim, &expected_component) in [X, Y, Z].into_iter().zip(expected) {
            approx::assert_abs_diff_eq!(field[dim], expected_component, epsilon = epsilon);
        }
    }
}

pub const CUBE_ABOVE: [[f64; 3]; 15] = [
    [1.30049e-13, 0.04050762672019437, 0.005467054395763381],
    [-7.74818e-14, 0.008339898219329745, 0.012673998232596063],
    [-2.98265e-13, -0.00894114471014558, 0.012659031851578212],
    [-1.44998e-13, -0.005305145921854352, -0.006486218981472727],
    [4.62064e-14, 0.0025769853669985257, -0.005852639651378765],
    [3.48942e-13, 0.01622673647452067, 0.005833903581001741],
    [2.49594e-13, 0.000217664816845019, 0.004525573401882199],
    [3.44542e-13, -0.01571376781824713, 0.005330194442501681],
    [2.70621e-13, -0.0017719872174590697, -0.007015750430349238],
    [-3.43085e-13, 0.006872303601084662, -0.008698569246270157],
    [-6.25783e-13, 0.012578619074111308, 0.008636251540939952],
    [-2.05004e-13, 0.0014462410865854498, 0.006219853821507807],
    [-1.98829e-13, -0.015643013367579433, 0.0045896812696729185],
    [-9.70776e-14, -0.005335392051906099, 0.010180228920163972],
    [-9.34111e-14, -0.02691940857413397, 0.0029232033842000885],
];

pub const CUBE_BESIDE: [[f64; 3]; 15] = [
    [-0.02267583536929591, -0.02668584217652007, -0.0016867571583455015],
    [-0.004893689584375202, -0.007462622850768515, -0.034390945350447],
    [0.044502981397780174, 0.017663994450641624, -0.014357606712345355],
    [0.03657696072735495, 0.01452770996897797, 0.028264259031775003],
    [-0.02530730385131446, -0.010768445258060918, 0.03518156676800467],
    [-0.044114530587223436, -0.021124954091209437, -0.008110306990898947],
    [0.00021766486800510465, 3.0588996796769314e-11, -0.041018628217512246],
    [0.04462749931464614, 0.021124954133026935, -0.008614016061706066],
    [0.026112301975111663, 0.01076844527369537, 0.034018455969522125],
    [-0.035009802933447375, -0.014527709932459514, 0.02605190880176584],
    [-0.04086550714792656, -0.017663994472947517, -0.018380386939093836],
    [0.014679828853431227, 0.007462622836390941, -0.04084508983255506],
    [0.04754044875130907, 0.026685842188568728, -0.002564130283190331],
    [0.01953722773478487, 0.017968676881478518, 0.03500980553496835],
    [-0.02492887408306263, 0.007084838685975191, 0.013842640429851982],
];

pub const CUBE_DIAGONAL: [[f64; 3]; 15] = [
    [0.015239086466337622, 0.001011948155698075, 7.076159910430747e-6],
    [0.005984533747553157, 0.0015759148783509877, -0.000053057299851446614],
    [-0.00016914845278838262, 0.007897940455371772, 0.002043204397668986],
    [-0.0005436752828819708, 0.006244980359662474, 0.003762439977567161],
    [0.0013089779955117512, -0.004047447325958433, 0.00419852764600375],
    [0.0036146572073705394, -0.0065536198725253255, 0.00031624325449553095],
    [0.00017906184459031262, 0.00017906186358674112, -0.004063230242454286],
    [-0.0031973120545974445, 0.00697096505533258, -0.00012250081295737025],
    [-0.0006742157960213232, 0.004682209541869015, 0.003213327385329202],
    [0.0017153035724593666, -0.0050733520543975626, 0.0019955723076551133],
    [0.0026514816073519563, -0.005415607310466083, -0.0008025069150555627],
    [-0.0003488648962614955, 0.004059753964915015, -0.003431240533888704],
    [-0.004694983208436868, 0.009532155104659597, 0.002319253579581008],
    [-0.005999313789114221, 0.004959068559419961, 0.010065344968708183],
    [-0.012637062966347638, -0.007411712410503368, 0.00484410409783074],
];

pub const RECTANGLE_DIAGONAL: [[f64; 3]; 17] = [
    [0.016424277530419782, 0.004859969636660026, 0.0006265905515855832],
    [0.007154771556406419, 0.002111901329473888, 0.0023304193332510737],
    [0.00039029390313573644, 0.006360603503739992, 0.0024169963118642825],
    [-0.0039588910563416, 0.005638710275473825, 0.0021239366008861393],
    [0.00006601469637097492, 0.002163907897239742, 0.0041782842497147445],
    [0.0037767058769945998, -0.004291985240902977, 0.0012571639548221538],
    [0.004695936397874936, -0.004485752938318748, 0.0007424600848474972],
    [0.00015146468300237436, 0.00019352635980213724, -0.002581675811747594],
    [-0.004356353562821242, 0.0049192800405609294, 0.0003741193168782884],
    [-0.003309297702610594, 0.004887300896420193, 0.0004531600739135287],
    [0.0006878357652581031, -0.0012074395204480697, 0.0027911012324712547],
    [0.005329416740797426, -0.00390997578553378, -0.00007906975238024467],
    [0.0023377063356237776, -0.0029509683808509406, -0.0007832716577587857],
    [-0.001529265058365573, 0.004821557431205883, -0.001035320638811146],
    [-0.0066827406938958205, 0.0069447716647040286, 0.002704488547569129],
    [-0.006172727552882329, 0.004765086834031235, 0.008262428945787267],
    [-0.011476920206438087, -0.007275923271958545, 0.008038694706564115],
];

pub const RECTANGLE_SHIFTED_X: [[f64; 3]; 17] = [
    [0.13927830767840257, 0.021656337672974663, 0.025268075464705646],
    [0.0001535416870135407, -0.036724434061261656, -0.0004732699557123156],
    [-0.00041145479657350763, 0.056877201075925914, 0.022199996947266924],
    [-0.09717936658388202, 0.01352198443466437, -0.019354710946583885],
    [0.006769376002273104, 0.02321607467411651, 0.034040672318710136],
    [0.037433808864478446, -0.044868371851654834, -0.04035276516698687],
    [0.07512751098424003, -0.02562392083201124, 0.04118503108133826],
    [0.00009760692384337277, 0.00012120887062121902, -0.036984166172887134],
    [-0.07490504393729365, 0.025899912962794484, 0.0407066791212218],
    [-0.037112926326347905, 0.045265345724613916, -0.04143840744934202],
    [-0.006210358156721235, -0.022527762977584423, 0.032017151299398944],
    [0.09832723817837069, -0.012119755526587738, -0.023060525945562044],
    [0.0032201105144855154, -0.05349603670915245, 0.015103991362735443],
    [0.008369509375153612, 0.04667571079516587, -0.014754059165147325],
    [-0.10627068862214141, 0.014501837445968242, 0.002305105049877767],
    [0.0021015807491625293, 0.05502997921055581, 0.028083102672821485],
    [-0.06913468740523643, -0.05816559438206288, 0.04048624626256832],
];

pub const RECTANGLE_SHIFTED_Y: [[f64; 3]; 17] = [
    [0.08709072805816237, 0.039889723536948585, 0.017119251265400825],
    [0.008552602463039473, -0.01604994506675768, 0.009204310723599283],
    [-0.0075349697472185785, 0.028032760584092133, 0.019448388248476743],
    [-0.0561523592461848, -0.006705602454958126, -0.011529449104827182],
    [0.0015127422699841863, 0.014026388276034968, 0.016669503644822663],
    [0.026793522553039267, -0.01645414479991868, -0.024106359961451673],
    [0.04471933930079376, -0.0027024153244977656, 0.02583708647229474],
    [0.00009614176725464269, 0.00014327336573287885, -0.018344061218375576],
    [-0.04450068257558006, 0.0030279535609697475, 0.025373925101160856],
    [-0.026480067450119125, 0.016919547801398472, -0.02515229850067376],
    [-0.000972196955544976, -0.01322749307941622, 0.014739239127083222],
    [0.05724421619360677, 0.008307164243823398, -0.014999945560385003],
    [0.010130388564428817, -0.02427681692999307, 0.013036187722605069],
    [-0.0011198169705533513, 0.026531508822903366, -0.0027112814847867883],
    [-0.06228591560507851, -0.006248705194736727, 0.003001104735131717],
    [-0.007516789786476071, 0.031162725335980447, 0.01692021307398986],
    [-0.04168744531989118, -0.04345954887323778, 0.027732406887236292],
];
